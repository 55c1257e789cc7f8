//! External command execution.
//!
//! Update scripts and check scripts are executed directly (no shell
//! wrapper) with their stdout and stderr optionally merged into a single
//! stream, so the captured text reads the way it would in a terminal.

use crate::error::{Result, UpdateError};
use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output, or the merged stream when stderr was merged.
    pub stdout: String,

    /// Standard error (empty when merged into stdout).
    pub stderr: String,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            success: false,
        }
    }

    fn from_status(status: std::process::ExitStatus, stdout: String, stderr: String) -> Self {
        if status.success() {
            Self::success(stdout, stderr)
        } else {
            Self::failure(status.code(), stdout, stderr)
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Send stderr into the same pipe as stdout.
    pub merge_stderr: bool,
}

impl CommandOptions {
    /// Options with the given arguments and separate stdout/stderr capture.
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// Execute a program and capture its output.
///
/// Returns `Err` only when the program could not be started; a non-zero
/// exit is reported through the `success` field of [`CommandResult`].
pub fn execute(program: &Path, options: &CommandOptions) -> Result<CommandResult> {
    let mut cmd = Command::new(program);
    cmd.args(&options.args);
    cmd.stdin(Stdio::null());

    let spawn_error = |e: std::io::Error| {
        tracing::debug!("Failed to start {}: {}", program.display(), e);
        UpdateError::CommandFailed {
            command: display_command(program, &options.args),
            code: None,
        }
    };

    if options.merge_stderr {
        let (mut reader, writer) = std::io::pipe()?;
        cmd.stdout(writer.try_clone()?);
        cmd.stderr(writer);

        let mut child = cmd.spawn().map_err(spawn_error)?;
        // The builder holds the write ends; drop it so the read hits EOF.
        drop(cmd);

        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        // Reap the child even when reading failed.
        drop(reader);
        let status = child.wait()?;
        read?;

        let output = String::from_utf8_lossy(&raw).to_string();
        return Ok(CommandResult::from_status(status, output, String::new()));
    }

    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    let output = cmd.output().map_err(spawn_error)?;

    Ok(CommandResult::from_status(
        output.status,
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    ))
}

/// Run a tool looked up on `PATH` and capture stdout and stderr separately.
pub fn execute_tool(program: &str, args: &[&str]) -> Result<CommandResult> {
    execute(Path::new(program), &CommandOptions::with_args(args.iter().copied()))
}

/// Render a program and its arguments for logs and error messages.
pub fn display_command(program: &Path, args: &[String]) -> String {
    let mut rendered = program.display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Runs a single executable and captures its merged output.
///
/// Update scripts and custom check scripts both go through this seam so
/// tests can substitute scripted results.
pub trait Executor {
    /// Execute `program` with no arguments.
    fn execute(&self, program: &Path) -> Result<CommandResult>;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&self, program: &Path) -> Result<CommandResult> {
        let options = CommandOptions {
            merge_stderr: true,
            ..Default::default()
        };
        execute(program, &options)
    }
}
