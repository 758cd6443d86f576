//! Mock system implementation for testing

use super::{CommandOutput, System};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem, scripted command results
/// and scripted operator input, perfect for fast, isolated unit tests
/// without side effects. Every command run and every prompt shown is
/// recorded so tests can assert on them afterwards.
///
/// # Example
/// ```
/// use lambda_hooks::system::{mock::MockSystem, CommandOutput, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_file("config.yml", b"development: {}").unwrap()
///     .with_command("yamllint", CommandOutput::ok("")).unwrap()
///     .with_secret("key:secret").unwrap();
///
/// assert!(system.exists(Path::new("config.yml")));
/// assert_eq!(system.prompt_secret("API key").unwrap(), "key:secret");
/// assert_eq!(system.prompts(), vec!["API key".to_owned()]);
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    current_dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    executables: HashSet<PathBuf>,
    commands: HashMap<String, CommandOutput>,
    invocations: Vec<Vec<String>>,
    secrets: VecDeque<String>,
    prompts: Vec<String>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                current_dir: PathBuf::from("/"),
                files: HashMap::new(),
                dirs: HashSet::from([PathBuf::from("/")]),
                executables: HashSet::new(),
                commands: HashMap::new(),
                invocations: Vec::new(),
                secrets: VecDeque::new(),
                prompts: Vec::new(),
            })),
        }
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        // Ensure parent directories exist
        if let Some(parent) = path_buf.parent() {
            Self::ensure_parent_dirs(&mut state.dirs, parent);
        }

        state.files.insert(path_buf, contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Script the result of running `program`, whatever its arguments
    ///
    /// Programs without a scripted result fail to spawn with `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_command(self, program: &str, output: CommandOutput) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.commands.insert(program.to_owned(), output);
        drop(state);
        Ok(self)
    }

    /// Queue an answer for the next secret prompt
    ///
    /// # Errors
    ///
    /// Returns an error if the internal state lock is poisoned
    #[inline]
    pub fn with_secret(self, secret: &str) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.secrets.push_back(secret.to_owned());
        drop(state);
        Ok(self)
    }

    /// Every command run so far, program first
    #[must_use]
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.state
            .read()
            .map(|state| state.invocations.clone())
            .unwrap_or_default()
    }

    /// Every prompt shown so far
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.state
            .read()
            .map(|state| state.prompts.clone())
            .unwrap_or_default()
    }

    /// Whether `set_executable` was called for `path`
    #[must_use]
    pub fn is_executable(&self, path: &Path) -> bool {
        self.state
            .read()
            .map(|state| state.executables.contains(path))
            .unwrap_or(false)
    }

    #[inline]
    fn ensure_parent_dirs(dirs: &mut HashSet<PathBuf>, path: &Path) {
        let mut current = path;

        while let Some(parent) = current.parent() {
            dirs.insert(parent.to_path_buf());
            current = parent;
            if parent == Path::new("") || parent == Path::new("/") {
                break;
            }
        }
        dirs.insert(path.to_path_buf());
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(state.current_dir.clone())
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if let Some(parent) = path.parent()
            && parent != Path::new("")
            && !state.dirs.contains(parent)
        {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Parent directory does not exist: {}", parent.display()),
            ));
        }

        state.files.insert(path.to_path_buf(), contents.to_vec());
        drop(state);
        Ok(())
    }

    #[inline]
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        Self::ensure_parent_dirs(&mut state.dirs, path);
        drop(state);
        Ok(())
    }

    #[inline]
    fn exists(&self, path: &Path) -> bool {
        self.state
            .read()
            .map(|state| state.files.contains_key(path) || state.dirs.contains(path))
            .unwrap_or(false)
    }

    #[inline]
    fn is_file(&self, path: &Path) -> bool {
        self.state
            .read()
            .map(|state| state.files.contains_key(path))
            .unwrap_or(false)
    }

    #[inline]
    fn set_executable(&self, path: &Path) -> io::Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        if !state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ));
        }

        state.executables.insert(path.to_path_buf());
        drop(state);
        Ok(())
    }

    #[inline]
    fn run_command(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        let mut invocation = vec![program.to_owned()];
        invocation.extend(args.iter().cloned());
        state.invocations.push(invocation);

        let output = state.commands.get(program).cloned();
        drop(state);

        output.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("Command not found: {program}"),
            )
        })
    }

    #[inline]
    fn prompt_secret(&self, prompt: &str) -> io::Result<String> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;

        state.prompts.push(prompt.to_owned());
        let secret = state.secrets.pop_front();
        drop(state);

        secret.ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "No input available"))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use super::*;

    #[test]
    fn unscripted_command_is_not_found() {
        let system = MockSystem::new();
        let err = system.run_command("yamllint", &[]).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(system.invocations(), vec![vec!["yamllint".to_owned()]]);
    }

    #[test]
    fn write_requires_parent_directory() {
        let system = MockSystem::new();
        assert!(system.write(Path::new("/repo/.git/hooks/pre-commit"), b"").is_err());

        system.create_dir_all(Path::new("/repo/.git/hooks")).unwrap();
        system
            .write(Path::new("/repo/.git/hooks/pre-commit"), b"#!/bin/sh")
            .unwrap();
        assert!(system.is_file(Path::new("/repo/.git/hooks/pre-commit")));
    }

    #[test]
    fn prompts_without_queued_secret_hit_eof() {
        let system = MockSystem::new();
        let err = system.prompt_secret("API key").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(system.prompts(), vec!["API key".to_owned()]);
    }
}
