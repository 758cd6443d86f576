//! Repository queries through libgit2

use crate::error::HookError;
use anyhow::Result;
use git2::Repository;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Open the repository containing `dir`
fn discover(dir: &Path) -> Result<Repository> {
    Repository::discover(dir).map_err(|e| {
        HookError::git(format!(
            "Not inside a git repository ({}): {}",
            dir.display(),
            e.message()
        ))
        .into()
    })
}

/// Name of the branch checked out in the repository containing `dir`
///
/// Mirrors `git rev-parse --abbrev-ref HEAD`: the short branch name, or
/// `HEAD` when detached. A branch without commits still resolves.
///
/// # Errors
///
/// Returns a git error if:
/// - `dir` is not inside a repository
/// - HEAD cannot be read
pub fn current_branch(dir: &Path) -> Result<String> {
    let repo = discover(dir)?;
    let head = repo
        .find_reference("HEAD")
        .map_err(|e| HookError::git(format!("Failed to read HEAD: {}", e.message())))?;

    let branch = match head.symbolic_target() {
        Some(target) => target
            .strip_prefix("refs/heads/")
            .unwrap_or(target)
            .to_owned(),
        None => "HEAD".to_owned(),
    };

    debug!("Current branch: {branch}");
    Ok(branch)
}

/// Directory git runs hooks from for the repository containing `dir`
///
/// Honors `core.hooksPath`, resolved against the working tree when
/// relative; defaults to `<git dir>/hooks`.
///
/// # Errors
///
/// Returns a git error if `dir` is not inside a repository
pub fn hooks_dir(dir: &Path) -> Result<PathBuf> {
    let repo = discover(dir)?;

    let configured = repo
        .config()
        .ok()
        .and_then(|config| config.get_path("core.hooksPath").ok());

    let hooks = match configured {
        Some(path) if path.is_absolute() => path,
        Some(path) => repo.workdir().unwrap_or_else(|| repo.path()).join(path),
        None => repo.path().join("hooks"),
    };

    debug!("Hooks directory: {}", hooks.display());
    Ok(hooks)
}
