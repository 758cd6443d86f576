use crate::config::{DEFAULT_CONFIG_FILE, DEFAULT_SCRIPT_FILE};
use crate::operations::tools::{DEFAULT_LINTER, DEFAULT_SYNTAX_CHECKER};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for lambda-hooks
#[derive(Parser, Debug, Clone)]
#[command(name = "lambda-hooks")]
#[command(about = "Git hooks that validate a lambda deployment config and deploy release branches")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Hook entry points
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check config.yml and the script it references (pre-commit)
    Validate(ValidateArgs),

    /// Deploy the lambda when a release branch is checked out (post-push)
    Deploy(DeployArgs),

    /// Write the pre-commit and pre-push hooks into this repository
    Install(InstallArgs),
}

/// Arguments for `validate`
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Configuration file path
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Script file inlined as the lambda code, relative to the configuration file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SCRIPT_FILE)]
    pub script: PathBuf,

    /// YAML lint command; the configuration path is appended
    #[arg(long, value_name = "CMD", default_value = DEFAULT_LINTER)]
    pub linter: String,

    /// Script syntax check command; the script path is appended
    #[arg(long = "syntax-checker", value_name = "CMD", default_value = DEFAULT_SYNTAX_CHECKER)]
    pub syntax_checker: String,

    /// Skip the YAML lint step
    #[arg(long = "no-lint")]
    pub no_lint: bool,
}

/// Arguments for `deploy`
#[derive(clap::Args, Debug, Clone)]
pub struct DeployArgs {
    /// Configuration file path
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Script file inlined as the lambda code, relative to the configuration file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SCRIPT_FILE)]
    pub script: PathBuf,

    /// Use this branch name instead of the checked-out branch
    #[arg(long, value_name = "NAME")]
    pub branch: Option<String>,

    /// Print the payload without prompting or sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Read the API key from the controlling terminal instead of stdin
    #[arg(long)]
    pub tty: bool,
}

/// Arguments for `install`
#[derive(clap::Args, Debug, Clone)]
pub struct InstallArgs {
    /// Replace hooks that were not installed by lambda-hooks
    #[arg(long)]
    pub force: bool,
}
