//! Configuration management module
//!
//! Handles parsing of `config.yml`, the per-environment deployment settings,
//! and validation of the document's shape

pub mod validation;
pub mod yaml;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default configuration file, relative to the repository root
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Default script artifact, relative to the configuration file
pub const DEFAULT_SCRIPT_FILE: &str = "code.js";

/// A named deployment target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Every environment a configuration must declare, in document order
    pub const ALL: [Self; 3] = [Self::Development, Self::Staging, Self::Production];

    /// The top-level YAML key for this environment
    #[must_use]
    #[inline]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|env| env.key() == s)
            .ok_or_else(|| format!("Unknown environment '{s}'"))
    }
}

/// Account or resource identifier, written as a string or an integer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(i64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The remote lambda description sent to the deployment API
///
/// Kept as an open JSON record: every field from the configuration is sent
/// as written, only `code` is rewritten when the script is inlined. Scalar
/// YAML keys such as `200` or `true` become their JSON string form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LambdaObject(Map<String, Value>);

impl<'de> Deserialize<'de> for LambdaObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mapping = serde_yaml::Mapping::deserialize(deserializer)?;
        let fields = yaml_mapping_to_json(mapping).map_err(D::Error::custom)?;
        Ok(Self(fields))
    }
}

fn yaml_mapping_to_json(mapping: serde_yaml::Mapping) -> Result<Map<String, Value>, String> {
    mapping
        .into_iter()
        .map(|(key, value)| Ok((yaml_key_to_string(key)?, yaml_to_json(value)?)))
        .collect()
}

fn yaml_key_to_string(key: serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_owned()),
        serde_yaml::Value::Tagged(tagged) => yaml_key_to_string(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            Err("object keys must be scalars".to_owned())
        }
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, String> {
    let json = match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("{n} cannot be represented in JSON"))?
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => Value::Object(yaml_mapping_to_json(mapping)?),
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    };
    Ok(json)
}

impl LambdaObject {
    /// Wrap an already parsed JSON record
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The resource identifier, if `id` is a string or an integer
    #[must_use]
    pub fn id(&self) -> Option<Identifier> {
        match self.0.get("id")? {
            Value::String(s) => Some(Identifier::Text(s.clone())),
            Value::Number(n) => Some(
                n.as_i64()
                    .map_or_else(|| Identifier::Text(n.to_string()), Identifier::Number),
            ),
            _ => None,
        }
    }

    /// Whether the object declares a `code` field, whatever its value
    #[must_use]
    #[inline]
    pub fn declares_code(&self) -> bool {
        self.0.contains_key("code")
    }

    /// Replace the `code` field with the script's full text
    pub fn inline_code(&mut self, source: String) {
        self.0.insert("code".to_owned(), Value::String(source));
    }

    /// Look up a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Render as indented JSON for operator display
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be serialized
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.0)
    }
}

/// Deployment settings for one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// API host name, without scheme or path
    pub host: String,
    pub account: Identifier,
    pub object: LambdaObject,
}

/// The complete, validated content of `config.yml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub development: EnvironmentConfig,
    pub staging: EnvironmentConfig,
    pub production: EnvironmentConfig,
}

impl DeployConfig {
    /// Settings for a single environment
    #[must_use]
    pub const fn environment(&self, env: Environment) -> &EnvironmentConfig {
        match env {
            Environment::Development => &self.development,
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }

    /// Whether any environment inlines the script artifact
    #[must_use]
    pub fn declares_code(&self) -> bool {
        Environment::ALL
            .into_iter()
            .any(|env| self.environment(env).object.declares_code())
    }
}

/// Resolve the script artifact next to the configuration file
///
/// Absolute script paths are returned untouched.
#[must_use]
pub fn resolve_script_path(config_path: &Path, script: &Path) -> PathBuf {
    if script.is_absolute() {
        return script.to_path_buf();
    }

    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(script),
        _ => script.to_path_buf(),
    }
}
