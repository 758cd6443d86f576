//! External collaborators: the YAML linter and the script syntax checker

use crate::error::HookError;
use crate::system::{CommandOutput, System};
use anyhow::{Result, anyhow};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Default lint command for the configuration file
pub const DEFAULT_LINTER: &str = "yamllint";

/// Default syntax check command for the script artifact
pub const DEFAULT_SYNTAX_CHECKER: &str = "node -c";

/// A command line to which the checked file's path is appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

impl ToolCommand {
    /// Program name, as looked up on `PATH`
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the tool against `target`, capturing its output
    ///
    /// # Errors
    ///
    /// Returns a tool error if the program cannot be started
    pub fn run(&self, system: &dyn System, target: &Path) -> Result<CommandOutput> {
        let mut args = self.args.clone();
        args.push(target.display().to_string());

        debug!("Running {} {}", self.program, args.join(" "));

        system.run_command(&self.program, &args).map_err(|e| {
            HookError::tool(format!(
                "Failed to run '{}': {e}\nInstall it or point the hook at another command",
                self
            ))
            .into()
        })
    }
}

impl FromStr for ToolCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace().map(str::to_owned);
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("Tool command cannot be empty"))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
