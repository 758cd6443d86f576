//! System abstraction for filesystem, subprocess and terminal operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing for easy testing with mock implementations.

use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::{RealSystem, SecretInput};

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited with status 0
    #[must_use]
    pub fn ok<S: Into<String>>(stdout: S) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a command that exited with `code`
    #[must_use]
    pub fn failed<S: Into<String>, E: Into<String>>(code: i32, stdout: S, stderr: E) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with status 0
    #[must_use]
    #[inline]
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Unified trait for system operations
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs`, `std::process`
///   and the terminal
/// - `MockSystem`: Test implementation using in-memory storage and scripted
///   command results
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write bytes to a file, creating it if it doesn't exist
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Recursively create a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> bool;

    /// Mark a file as executable by its owner, group and others
    fn set_executable(&self, path: &Path) -> io::Result<()>;

    // ==================== Process Operations ====================

    /// Run `program` with `args` to completion, capturing its output
    ///
    /// A command that runs and exits non-zero is `Ok`; only a failure to
    /// spawn it is an error.
    fn run_command(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;

    // ==================== Terminal Operations ====================

    /// Ask the operator for a secret, blocking until a line is entered
    fn prompt_secret(&self, prompt: &str) -> io::Result<String>;
}
