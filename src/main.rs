//! # `lambda-hooks`
//!
//! Git hooks for a repository that holds the source of one serverless
//! function and its per-environment deployment settings.
//!
//! ## Commands
//! - `validate`: pre-commit check of `config.yml` and `code.js`. Silent on
//!   success.
//! - `deploy`: on `release-development`, `release-staging` or
//!   `release-production`, inline `code.js`, ask for the API key and PATCH
//!   the lambda. Any other branch is a no-op.
//! - `install`: write the `pre-commit` and `pre-push` hooks.
//!
//! ## Usage
//!
//! ```sh
//! lambda-hooks install
//! lambda-hooks validate --config config.yml
//! lambda-hooks deploy --branch release-staging --dry-run
//! ```

use anyhow::Result;
use clap::Parser as _;
use lambda_hooks::cli::{Args, Commands};
use lambda_hooks::error::HookError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // A passing pre-commit check prints nothing
    let log_level = if args.verbose {
        "debug"
    } else if matches!(args.command, Commands::Validate(_)) {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    let result = match &args.command {
        Commands::Validate(validate) => lambda_hooks::run_validate(validate),
        Commands::Deploy(deploy) => lambda_hooks::run_deploy(deploy),
        Commands::Install(install) => lambda_hooks::run_install(install),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<HookError>()
                    .map_or(1, HookError::exit_code),
            );
        }
    }
}
