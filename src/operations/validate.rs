//! Pre-commit validation of the deployment configuration

use crate::cli::ValidateArgs;
use crate::config::validation::{ValidationIssue, validate_document};
use crate::config::{DeployConfig, resolve_script_path, yaml};
use crate::error::HookError;
use crate::operations::tools::ToolCommand;
use crate::system::System;
use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

/// Resolved inputs for a validation run
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub config_path: PathBuf,
    pub script_path: PathBuf,
    /// `None` skips the lint step
    pub linter: Option<ToolCommand>,
    pub syntax_checker: ToolCommand,
}

impl ValidateOptions {
    /// Resolve CLI arguments
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a tool command is blank
    pub fn from_args(args: &ValidateArgs) -> Result<Self> {
        let linter = if args.no_lint {
            None
        } else {
            Some(
                args.linter
                    .parse::<ToolCommand>()
                    .map_err(|e| HookError::configuration(format!("--linter: {e}")))?,
            )
        };

        let syntax_checker = args
            .syntax_checker
            .parse::<ToolCommand>()
            .map_err(|e| HookError::configuration(format!("--syntax-checker: {e}")))?;

        Ok(Self {
            script_path: resolve_script_path(&args.config, &args.script),
            config_path: args.config.clone(),
            linter,
            syntax_checker,
        })
    }
}

/// Checks `config.yml` and, when referenced, the script artifact
#[non_exhaustive]
pub struct ValidateOperation<'src> {
    options: ValidateOptions,
    system: &'src dyn System,
}

impl<'src> ValidateOperation<'src> {
    #[must_use]
    #[inline]
    pub const fn new(options: ValidateOptions, system: &'src dyn System) -> Self {
        Self { options, system }
    }

    /// Run every check, returning the decoded configuration
    ///
    /// Stops at the first failing stage: lint, parse, shape, script. The
    /// shape stage reports every issue it finds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if lint, parsing or shape checks fail,
    /// a script error if the script artifact is missing or invalid, and a
    /// tool error if a collaborator cannot be started.
    #[inline]
    pub fn execute(&self) -> Result<DeployConfig> {
        self.lint()?;

        let file = self.options.config_path.display().to_string();
        let document = yaml::load_document(self.system, &self.options.config_path)?;

        let mut report = validate_document(&document, &file);
        if !report.is_empty() {
            return Err(HookError::configuration(report.to_string()).into());
        }

        let config = match yaml::decode_config(document) {
            Ok(config) => config,
            Err(e) => {
                report.push(ValidationIssue::Shape {
                    file,
                    message: e.to_string(),
                });
                return Err(HookError::configuration(report.to_string()).into());
            }
        };

        if config.declares_code() {
            self.check_script()?;
        }

        debug!("{} is valid", self.options.config_path.display());
        Ok(config)
    }

    fn lint(&self) -> Result<()> {
        let Some(linter) = self.options.linter.as_ref() else {
            debug!("Lint step skipped");
            return Ok(());
        };

        let output = linter.run(self.system, &self.options.config_path)?;
        if output.success() {
            return Ok(());
        }

        Err(HookError::configuration(format!(
            "Invalid YAML format in {}:\n{}",
            self.options.config_path.display(),
            output.stdout.trim_end()
        ))
        .into())
    }

    fn check_script(&self) -> Result<()> {
        let script = &self.options.script_path;

        if !self.system.is_file(script) {
            return Err(HookError::script(format!("Missing {} file", script.display())).into());
        }

        let output = self.options.syntax_checker.run(self.system, script)?;
        if output.success() {
            return Ok(());
        }

        let mut message = format!("{} is not valid JavaScript", script.display());
        let diagnostics = output.stderr.trim();
        if !diagnostics.is_empty() {
            message.push('\n');
            message.push_str(diagnostics);
        }

        Err(HookError::script(message).into())
    }
}
