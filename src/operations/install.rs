//! Installation of the git hook scripts

use crate::error::HookError;
use crate::system::System;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// First line after the shebang of every hook this tool writes
pub const HOOK_MARKER: &str = "# Installed by lambda-hooks";

/// A hook script managed by this tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookScript {
    /// File name under the hooks directory
    pub name: &'static str,
    /// Command the hook hands over to
    pub command: &'static str,
}

/// Validate before every commit, deploy on push. Git feeds pre-push the
/// pushed refs on stdin, so the deploy prompt reads the terminal instead,
/// and only once a release branch is known.
pub const HOOKS: [HookScript; 2] = [
    HookScript {
        name: "pre-commit",
        command: "lambda-hooks validate",
    },
    HookScript {
        name: "pre-push",
        command: "lambda-hooks deploy --tty",
    },
];

impl HookScript {
    /// Shell script content for this hook
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "#!/bin/sh\n{HOOK_MARKER}. Re-run `lambda-hooks install` to update.\nexec {}\n",
            self.command
        )
    }
}

/// Result of installing one hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    Installed(PathBuf),
    /// A hook not written by this tool is in the way
    Skipped(PathBuf),
}

/// Write every hook into `hooks_dir`
///
/// Hooks written by this tool are always refreshed; foreign hooks are only
/// replaced with `force`.
///
/// # Errors
///
/// Returns a filesystem-level git error if the directory or a hook cannot
/// be written
pub fn install_hooks(
    system: &dyn System,
    hooks_dir: &Path,
    force: bool,
) -> Result<Vec<InstallStatus>> {
    system.create_dir_all(hooks_dir).map_err(|e| {
        HookError::git(format!(
            "Failed to create hooks directory {}: {e}",
            hooks_dir.display()
        ))
    })?;

    let mut statuses = Vec::with_capacity(HOOKS.len());

    for hook in &HOOKS {
        let path = hooks_dir.join(hook.name);

        if !force && is_foreign_hook(system, &path) {
            warn!(
                "{} already exists and was not installed by lambda-hooks; use --force to replace it",
                path.display()
            );
            statuses.push(InstallStatus::Skipped(path));
            continue;
        }

        system
            .write(&path, hook.render().as_bytes())
            .and_then(|()| system.set_executable(&path))
            .map_err(|e| {
                HookError::git(format!("Failed to write hook {}: {e}", path.display()))
            })?;

        info!("Installed {} hook at {}", hook.name, path.display());
        statuses.push(InstallStatus::Installed(path));
    }

    Ok(statuses)
}

fn is_foreign_hook(system: &dyn System, path: &Path) -> bool {
    if !system.exists(path) {
        return false;
    }

    system
        .read_to_string(path)
        .map_or(true, |content| !content.contains(HOOK_MARKER))
}
