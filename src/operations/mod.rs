//! Hook operations module
//!
//! Contains the validation, deployment and installation logic

pub mod api;
pub mod deploy;
pub mod install;
pub mod tools;
pub mod validate;

pub use api::{ApiResponse, Credential, HttpLambdaApi, LambdaApi, PatchRequest};
pub use deploy::{DeployOperation, DeployOptions, DeployOutcome};
pub use install::{InstallStatus, install_hooks};
pub use tools::ToolCommand;
pub use validate::{ValidateOperation, ValidateOptions};
