//! YAML configuration loading and parsing

use crate::config::{DeployConfig, Environment, EnvironmentConfig};
use crate::error::HookError;
use crate::system::System;
use anyhow::Result;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

/// Read and parse `config.yml` into a raw YAML document
///
/// Merge keys (`<<: *base`) are expanded, so anchored records are seen
/// with their inherited fields.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read or is not YAML
pub fn load_document(system: &dyn System, path: &Path) -> Result<Value> {
    let file = path.display();
    debug!("Loading configuration from {file}");

    let content = system
        .read_to_string(path)
        .map_err(|e| HookError::configuration(format!("Failed to load {file}: {e}")))?;

    let mut document: Value = serde_yaml::from_str(&content)
        .map_err(|e| HookError::configuration(format!("Failed to load {file}: {e}")))?;
    document
        .apply_merge()
        .map_err(|e| HookError::configuration(format!("Failed to load {file}: {e}")))?;

    Ok(document)
}

/// Decode a document that already passed shape validation
///
/// # Errors
///
/// Returns an error if a field has the wrong type
pub fn decode_config(document: Value) -> Result<DeployConfig, serde_yaml::Error> {
    serde_yaml::from_value(document)
}

/// Load the settings for one environment, ignoring the others
///
/// # Errors
///
/// Returns a configuration error if:
/// - The file cannot be read or parsed
/// - The environment is missing
/// - The environment record does not decode
pub fn load_environment(
    system: &dyn System,
    path: &Path,
    env: Environment,
) -> Result<EnvironmentConfig> {
    let document = load_document(system, path)?;
    let file = path.display();

    let record = match document.get(env.key()) {
        None | Some(Value::Null) => {
            return Err(
                HookError::configuration(format!("Missing '{env}' key in {file}")).into(),
            );
        }
        Some(record) => record.clone(),
    };

    let config = serde_yaml::from_value(record).map_err(|e| {
        HookError::configuration(format!("Invalid '{env}' entry in {file}: {e}"))
    })?;

    Ok(config)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;
    use crate::config::Identifier;
    use crate::system::MockSystem;

    const CONFIG: &str = r#"
staging:
  host: staging.example.com
  account: 777
  object:
    id: LAM-2
    code: placeholder
"#;

    #[test]
    fn loads_single_environment() {
        let system = MockSystem::new()
            .with_file("config.yml", CONFIG.as_bytes())
            .unwrap();

        let env = load_environment(&system, Path::new("config.yml"), Environment::Staging).unwrap();
        assert_eq!(env.host, "staging.example.com");
        assert_eq!(env.account, Identifier::Number(777));
        assert_eq!(env.object.id(), Some(Identifier::Text("LAM-2".to_owned())));
    }

    #[test]
    fn missing_environment_is_configuration_error() {
        let system = MockSystem::new()
            .with_file("config.yml", CONFIG.as_bytes())
            .unwrap();

        let err = load_environment(&system, Path::new("config.yml"), Environment::Production)
            .unwrap_err();
        let hook_error = err.downcast_ref::<HookError>().unwrap();
        assert_eq!(hook_error.exit_code(), 1);
        assert!(err.to_string().contains("Missing 'production' key in config.yml"));
    }

    #[test]
    fn merge_keys_are_expanded() {
        let system = MockSystem::new()
            .with_file(
                "config.yml",
                b"base: &base\n  host: api.example.com\n  account: 1\nstaging:\n  <<: *base\n  object: {id: 5}\n",
            )
            .unwrap();

        let env = load_environment(&system, Path::new("config.yml"), Environment::Staging).unwrap();
        assert_eq!(env.host, "api.example.com");
        assert_eq!(env.account, Identifier::Number(1));
        assert_eq!(env.object.id(), Some(Identifier::Number(5)));
    }

    #[test]
    fn invalid_merge_reports_failed_load() {
        let system = MockSystem::new()
            .with_file("config.yml", b"staging:\n  <<: just-a-string\n")
            .unwrap();
        let err = load_document(&system, Path::new("config.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to load config.yml"));
    }

    #[test]
    fn unreadable_file_reports_failed_load() {
        let system = MockSystem::new();
        let err = load_document(&system, Path::new("config.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to load config.yml"));
    }

    #[test]
    fn malformed_yaml_reports_failed_load() {
        let system = MockSystem::new()
            .with_file("config.yml", b"staging: [unclosed")
            .unwrap();
        let err = load_document(&system, Path::new("config.yml")).unwrap_err();
        assert!(err.to_string().contains("Failed to load config.yml"));
    }
}
