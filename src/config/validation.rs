//! Configuration validation logic
//!
//! The document is checked in a single pass and every problem found is
//! collected into a [`ValidationReport`], so one run of the pre-commit hook
//! names everything that needs fixing.

use crate::config::Environment;
use anyhow::{Result, anyhow};
use regex::Regex;
use serde_yaml::Value;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Keys every environment record must carry with a non-null value
pub const REQUIRED_ENVIRONMENT_KEYS: [&str; 3] = ["host", "object", "account"];

static HOST_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?(?::[0-9]{1,5})?$").ok()
});

/// A single problem found in the configuration document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationIssue {
    #[error("Missing '{env}' key in {file}")]
    MissingEnvironment { env: Environment, file: String },

    #[error("Missing '{key}' key in {file} for {env}\n\n{record}")]
    MissingKey {
        key: &'static str,
        env: Environment,
        file: String,
        record: String,
    },

    #[error("'{path}' in {file} must be a mapping")]
    NotAMapping { path: String, file: String },

    #[error("Invalid host '{host}' for {env}: expected a bare host name such as api.example.com")]
    InvalidHost { env: Environment, host: String },

    #[error("Missing or invalid 'id' in the object for {env}: expected a string or an integer")]
    InvalidObjectId { env: Environment },

    #[error("{file} does not match the expected shape: {message}")]
    Shape { file: String, message: String },
}

/// Every issue found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether the document passed every check
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues in the order they were found
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Record another issue
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration validation failed:")?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

/// Check the raw configuration document against the required shape
///
/// `file` names the document in messages. An empty document is treated as an
/// empty mapping.
#[must_use]
pub fn validate_document(document: &Value, file: &str) -> ValidationReport {
    let mut report = ValidationReport::default();

    match document {
        Value::Mapping(_) | Value::Null => {}
        _ => {
            report.push(ValidationIssue::NotAMapping {
                path: "document".to_owned(),
                file: file.to_owned(),
            });
            return report;
        }
    }

    for env in Environment::ALL {
        match document.get(env.key()) {
            None | Some(Value::Null) => report.push(ValidationIssue::MissingEnvironment {
                env,
                file: file.to_owned(),
            }),
            Some(record @ Value::Mapping(_)) => {
                validate_environment(&mut report, env, record, file);
            }
            Some(_) => report.push(ValidationIssue::NotAMapping {
                path: env.key().to_owned(),
                file: file.to_owned(),
            }),
        }
    }

    report
}

/// Check one environment record
fn validate_environment(report: &mut ValidationReport, env: Environment, record: &Value, file: &str) {
    for key in REQUIRED_ENVIRONMENT_KEYS {
        if matches!(record.get(key), None | Some(Value::Null)) {
            report.push(ValidationIssue::MissingKey {
                key,
                env,
                file: file.to_owned(),
                record: render_record(record),
            });
        }
    }

    if let Some(Value::String(host)) = record.get("host")
        && validate_host(host).is_err()
    {
        report.push(ValidationIssue::InvalidHost {
            env,
            host: host.clone(),
        });
    }

    match record.get("object") {
        None | Some(Value::Null) => {}
        Some(object @ Value::Mapping(_)) => {
            if !matches!(object.get("id"), Some(Value::String(_) | Value::Number(_))) {
                report.push(ValidationIssue::InvalidObjectId { env });
            }
        }
        Some(_) => report.push(ValidationIssue::NotAMapping {
            path: format!("{}.object", env.key()),
            file: file.to_owned(),
        }),
    }
}

fn render_record(record: &Value) -> String {
    serde_yaml::to_string(record)
        .map_or_else(|_| format!("{record:?}"), |yaml| yaml.trim_end().to_owned())
}

/// Validate that a host is a bare host name with an optional port
///
/// # Errors
///
/// Returns an error if:
/// - The host carries a scheme, a path or whitespace
/// - The host is empty
#[inline]
pub fn validate_host(host: &str) -> Result<()> {
    let pattern = HOST_PATTERN
        .as_ref()
        .ok_or_else(|| anyhow!("Host name pattern failed to compile"))?;

    if pattern.is_match(host) {
        return Ok(());
    }

    Err(anyhow!(
        "Invalid host '{host}'. Use a bare host name such as api.example.com"
    ))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;

    fn report_for(yaml: &str) -> ValidationReport {
        let document: Value = serde_yaml::from_str(yaml).unwrap();
        validate_document(&document, "config.yml")
    }

    const VALID: &str = r#"
development:
  host: dev.example.com
  account: "100"
  object: { id: 1, code: "" }
staging:
  host: staging.example.com
  account: "200"
  object: { id: 2 }
production:
  host: api.example.com
  account: 300
  object: { id: "LAM-3" }
"#;

    #[test]
    fn valid_document_has_no_issues() {
        assert!(report_for(VALID).is_empty());
    }

    #[test]
    fn empty_document_misses_every_environment() {
        let report = report_for("");
        assert_eq!(report.issues().len(), 3);
        assert_eq!(
            report.issues()[0].to_string(),
            "Missing 'development' key in config.yml"
        );
    }

    #[test]
    fn null_field_counts_as_missing() {
        let report = report_for(&VALID.replace("host: staging.example.com", "host: ~"));
        assert_eq!(report.issues().len(), 1);

        let message = report.issues()[0].to_string();
        assert!(message.starts_with("Missing 'host' key in config.yml for staging"));
        assert!(message.contains("account:"));
    }

    #[test]
    fn every_problem_is_reported_at_once() {
        let report = report_for(
            r#"
development:
  host: dev.example.com
staging: "not a record"
"#,
        );

        let messages: Vec<String> = report.issues().iter().map(ToString::to_string).collect();
        assert_eq!(messages.len(), 4);
        assert!(messages[0].starts_with("Missing 'object' key in config.yml for development"));
        assert!(messages[1].starts_with("Missing 'account' key in config.yml for development"));
        assert_eq!(messages[2], "'staging' in config.yml must be a mapping");
        assert_eq!(messages[3], "Missing 'production' key in config.yml");
    }

    #[test]
    fn object_needs_scalar_id() {
        let report = report_for(&VALID.replace("object: { id: 2 }", "object: { code: x }"));
        assert_eq!(
            report.issues(),
            &[ValidationIssue::InvalidObjectId {
                env: Environment::Staging
            }]
        );
    }

    #[test]
    fn report_display_lists_issues() {
        let report = report_for("production: {}");
        let text = report.to_string();
        assert!(text.starts_with("Configuration validation failed:\n  - "));
        assert!(text.contains("Missing 'staging' key in config.yml"));
    }

    #[test]
    fn test_validate_host() {
        assert!(validate_host("api.example.com").is_ok());
        assert!(validate_host("localhost:8443").is_ok());
        assert!(validate_host("a").is_ok());

        assert!(validate_host("").is_err());
        assert!(validate_host("https://api.example.com").is_err());
        assert!(validate_host("api.example.com/v1").is_err());
        assert!(validate_host("api example.com").is_err());
    }
}
