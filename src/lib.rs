//! `lambda-hooks` - Git hooks for a repository holding one serverless function
//!
//! This library validates the deployment configuration before commits,
//! deploys the function's code when a release branch is pushed, and installs
//! the hook scripts that do both.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod operations;
pub mod system;

use anyhow::Result;
use cli::{DeployArgs, InstallArgs, ValidateArgs};
use operations::{
    DeployOperation, DeployOptions, HttpLambdaApi, InstallStatus, ValidateOperation,
    ValidateOptions, install_hooks,
};
use system::{RealSystem, System as _};

/// Run the validate command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let system = RealSystem::new();
    let options = ValidateOptions::from_args(args)?;
    ValidateOperation::new(options, &system).execute()?;
    Ok(())
}

/// Run the deploy command
pub fn run_deploy(args: &DeployArgs) -> Result<()> {
    let system = if args.tty {
        RealSystem::new().with_terminal_input()
    } else {
        RealSystem::new()
    };

    let branch = match args.branch.as_ref() {
        Some(branch) => branch.clone(),
        None => git::current_branch(&system.current_dir()?)?,
    };

    let api = HttpLambdaApi::new();
    let options = DeployOptions::from_args(args);
    DeployOperation::new(options, &system, &api).execute(&branch)?;
    Ok(())
}

/// Run the install command
pub fn run_install(args: &InstallArgs) -> Result<()> {
    let system = RealSystem::new();
    let hooks_dir = git::hooks_dir(&system.current_dir()?)?;

    let statuses = install_hooks(&system, &hooks_dir, args.force)?;

    // Output to stdout (not using logging)
    for status in statuses {
        match status {
            InstallStatus::Installed(path) => println!("installed {}", path.display()),
            InstallStatus::Skipped(path) => println!("skipped {}", path.display()),
        }
    }

    Ok(())
}
