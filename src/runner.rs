use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::TransferError;

/// What to do when a command exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Abort the workflow with [`TransferError::CommandFailed`].
    Fatal,
    /// Log the error and hand back whatever stdout was produced.
    Tolerated,
}

/// A single external command: program, arguments and working directory.
///
/// Arguments are passed to the program directly, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: &str) -> Self {
        Invocation {
            program: program.to_string(),
            args: Vec::new(),
            dir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the command inside `dir` instead of the process working directory.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.dir = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for a in &self.args {
            if a.contains(char::is_whitespace) {
                write!(f, " \"{}\"", a)?;
            } else {
                write!(f, " {}", a)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Executes invocations. Swapped for a recording fake in tests.
pub trait CommandRunner {
    /// Runs `inv` to completion and captures its output.
    ///
    /// A command that cannot be spawned reports `success: false` with the
    /// spawn error as `stderr`.
    fn execute(&mut self, inv: &Invocation) -> CommandOutput;
}

/// Runs commands with [`std::process::Command`], blocking until they exit.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn execute(&mut self, inv: &Invocation) -> CommandOutput {
        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args);
        if let Some(dir) = &inv.dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        match cmd.output() {
            Ok(out) => CommandOutput {
                success: out.status.success(),
                stdout: String::from_utf8_lossy(&out.stdout).to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).to_string(),
            },
            Err(e) => CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("cannot run `{}`: {}", inv.program, e),
            },
        }
    }
}

/// Runs `inv` and returns its trimmed stdout.
///
/// On a non-zero exit the captured stderr is logged. With
/// [`OnFailure::Fatal`] the failure becomes [`TransferError::CommandFailed`];
/// with [`OnFailure::Tolerated`] the partial stdout is returned so the caller
/// can inspect it.
pub fn run_command<R: CommandRunner + ?Sized>(
    runner: &mut R,
    inv: &Invocation,
    on_failure: OnFailure,
) -> Result<String, TransferError> {
    tracing::debug!(command = %inv, "running");
    let out = runner.execute(inv);
    let stdout = out.stdout.trim().to_string();

    if out.success {
        return Ok(stdout);
    }

    let stderr = out.stderr.trim().to_string();
    tracing::error!("Error: {}", stderr);

    match on_failure {
        OnFailure::Fatal => Err(TransferError::CommandFailed {
            command: inv.to_string(),
            stderr,
        }),
        OnFailure::Tolerated => Ok(stdout),
    }
}
