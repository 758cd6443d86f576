//! Real system implementation using `std::fs`, `std::process` and the terminal

use super::{CommandOutput, System};
use dialoguer::Password;
use std::fs;
use std::io::{self, BufRead as _, BufReader, IsTerminal as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where `prompt_secret` reads its answer from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecretInput {
    /// Standard input: hidden when it is a terminal, one line when piped
    #[default]
    Stdin,
    /// The controlling terminal, whatever stdin is connected to
    Terminal,
}

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library's
/// filesystem and process functions, and to `dialoguer` for hidden input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSystem {
    secret_input: SecretInput,
}

impl RealSystem {
    /// Create a new `RealSystem` instance reading secrets from stdin
    #[must_use]
    pub const fn new() -> Self {
        Self {
            secret_input: SecretInput::Stdin,
        }
    }

    /// Read secrets from the controlling terminal
    ///
    /// Git hooks get data on stdin, so they cannot ask for input there.
    #[must_use]
    pub const fn with_terminal_input(self) -> Self {
        Self {
            secret_input: SecretInput::Terminal,
        }
    }

    #[must_use]
    pub const fn secret_input(&self) -> SecretInput {
        self.secret_input
    }

    fn prompt_hidden(prompt: &str) -> io::Result<String> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(io::Error::other)
    }

    fn prompt_stdin(prompt: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            return Self::prompt_hidden(prompt);
        }

        // Piped input: the prompt still goes to the operator, the answer is one line
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}: ")?;
        stderr.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn prompt_terminal(prompt: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            return Self::prompt_hidden(prompt);
        }

        let mut terminal = open_terminal().map_err(|e| {
            io::Error::new(e.kind(), format!("No terminal available to read the API key: {e}"))
        })?;

        // dialoguer falls back to the controlling terminal when stdin is not one
        if io::stderr().is_terminal() {
            drop(terminal);
            return Self::prompt_hidden(prompt);
        }

        write!(terminal, "{prompt}: ")?;
        terminal.flush()?;

        let mut line = String::new();
        BufReader::new(terminal).read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }
}

#[cfg(unix)]
fn open_terminal() -> io::Result<fs::File> {
    fs::OpenOptions::new().read(true).write(true).open("/dev/tty")
}

#[cfg(not(unix))]
fn open_terminal() -> io::Result<fs::File> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no controlling terminal on this platform",
    ))
}

impl System for RealSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    #[cfg(unix)]
    fn set_executable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt as _;

        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(path, permissions)
    }

    #[cfg(not(unix))]
    fn set_executable(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn run_command(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn prompt_secret(&self, prompt: &str) -> io::Result<String> {
        match self.secret_input {
            SecretInput::Stdin => Self::prompt_stdin(prompt),
            SecretInput::Terminal => Self::prompt_terminal(prompt),
        }
    }
}
