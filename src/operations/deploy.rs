//! Release-branch deployment of the lambda

use crate::cli::DeployArgs;
use crate::config::{Environment, resolve_script_path, yaml};
use crate::error::HookError;
use crate::git::ReleaseBranch;
use crate::operations::api::{Credential, LambdaApi, PatchRequest};
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Resolved inputs for a deploy run
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub config_path: PathBuf,
    pub script_path: PathBuf,
    pub dry_run: bool,
}

impl DeployOptions {
    #[must_use]
    pub fn from_args(args: &DeployArgs) -> Self {
        Self {
            script_path: resolve_script_path(&args.config, &args.script),
            config_path: args.config.clone(),
            dry_run: args.dry_run,
        }
    }
}

/// What a deploy run did
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DeployOutcome {
    /// The branch is not a release branch
    Skipped,
    /// The payload was printed but not sent
    DryRun {
        environment: Environment,
        request: PatchRequest,
    },
    /// The API accepted the request
    Deployed {
        environment: Environment,
        request: PatchRequest,
        status: u16,
    },
}

/// Pushes the environment's lambda when a release branch is checked out
#[non_exhaustive]
pub struct DeployOperation<'src> {
    options: DeployOptions,
    system: &'src dyn System,
    api: &'src dyn LambdaApi,
}

impl<'src> DeployOperation<'src> {
    #[must_use]
    #[inline]
    pub const fn new(
        options: DeployOptions,
        system: &'src dyn System,
        api: &'src dyn LambdaApi,
    ) -> Self {
        Self {
            options,
            system,
            api,
        }
    }

    /// Deploy for `branch`, or do nothing if it is not a release branch
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration or the environment entry cannot be loaded
    /// - The script artifact cannot be read
    /// - No credential is entered
    /// - The request fails or the API rejects it
    #[inline]
    pub fn execute(&self, branch: &str) -> Result<DeployOutcome> {
        let Some(release) = ReleaseBranch::parse(branch) else {
            debug!("Branch '{branch}' is not a release branch, nothing to deploy");
            return Ok(DeployOutcome::Skipped);
        };
        let environment = release.environment();

        let mut env_config =
            yaml::load_environment(self.system, &self.options.config_path, environment)?;

        if env_config.object.declares_code() {
            let script = &self.options.script_path;
            let source = self.system.read_to_string(script).map_err(|e| {
                HookError::script(format!("Failed to read {}: {e}", script.display()))
            })?;
            env_config.object.inline_code(source);
        }

        let request = PatchRequest::for_environment(&env_config)?;

        if self.options.dry_run {
            print_payload(&request)?;
            info!("Dry run: not sending to {}", request.url());
            return Ok(DeployOutcome::DryRun {
                environment,
                request,
            });
        }

        let input = self
            .system
            .prompt_secret(&format!("Enter your API key for branch {release}"))
            .map_err(|e| HookError::deploy(format!("Failed to read the API key: {e}")))?;
        let credential = Credential::parse(&input)?;

        print_payload(&request)?;

        let response = self.api.patch_lambda(&request, &credential)?;
        if !response.is_success() {
            return Err(HookError::deploy(format!(
                "Deployment to {environment} was rejected with HTTP {}: {}",
                response.status,
                response.body.trim()
            ))
            .into());
        }

        info!(
            "Deployed to {environment} (HTTP {}): {}",
            response.status,
            request.url()
        );

        Ok(DeployOutcome::Deployed {
            environment,
            request,
            status: response.status,
        })
    }
}

/// Show the operator exactly what is about to be sent
fn print_payload(request: &PatchRequest) -> Result<()> {
    let payload = request
        .object()
        .to_pretty_json()
        .context("Failed to render the lambda object")?;

    // Output to stdout (not using logging)
    println!("deploying {payload}");
    Ok(())
}
