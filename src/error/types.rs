//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for lambda-hooks operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HookError {
    /// Configuration Error - unreadable, malformed or incomplete config.yml
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Script Error - the script artifact is missing or does not parse
    #[error("Script error: {message}")]
    Script { message: String },

    /// Tool Error - an external collaborator could not be run
    #[error("Tool error: {message}")]
    Tool { message: String },

    /// Git Error - the current branch or hooks directory could not be resolved
    #[error("Git error: {message}")]
    Git { message: String },

    /// Deploy Error - the deployment request failed or was rejected
    #[error("Deploy error: {message}")]
    Deploy { message: String },
}

impl HookError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Script { .. } => 2,
            Self::Tool { .. } => 3,
            Self::Git { .. } => 4,
            Self::Deploy { .. } => 5,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a script error
    #[inline]
    pub fn script<S: Into<String>>(message: S) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    /// Create a tool error
    #[inline]
    pub fn tool<S: Into<String>>(message: S) -> Self {
        Self::Tool {
            message: message.into(),
        }
    }

    /// Create a git error
    #[inline]
    pub fn git<S: Into<String>>(message: S) -> Self {
        Self::Git {
            message: message.into(),
        }
    }

    /// Create a deploy error
    #[inline]
    pub fn deploy<S: Into<String>>(message: S) -> Self {
        Self::Deploy {
            message: message.into(),
        }
    }
}
