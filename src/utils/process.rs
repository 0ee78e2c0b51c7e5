//! Process execution utilities
//!
//! Runs external tools with their output streamed line by line into the
//! log. A child is always reaped before the runner returns, whatever the
//! outcome.

use crate::error::{PackageError, Result};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use tracing::{debug, info, instrument, warn};

/// Utility for running external processes
#[derive(Debug)]
pub struct ProcessRunner {
    debug: bool,
}

/// Owns a spawned child. Dropping it without a successful `wait` kills and
/// reaps the process.
struct ChildGuard {
    child: Child,
    reaped: bool,
}

impl ChildGuard {
    fn spawn(cmd: &mut Command) -> io::Result<Self> {
        Ok(Self {
            child: cmd.spawn()?,
            reaped: false,
        })
    }

    /// Drain stdout and stderr into the log, then wait for exit
    fn stream_to_log(&mut self) -> io::Result<ExitStatus> {
        let stdout = self.child.stdout.take();
        let stderr = self.child.stderr.take();

        thread::scope(|scope| {
            if let Some(stderr) = stderr {
                scope.spawn(move || log_lines(stderr));
            }
            if let Some(stdout) = stdout {
                log_lines(stdout);
            }
        });

        let status = self.child.wait()?;
        self.reaped = true;
        Ok(status)
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.reaped {
            if let Err(e) = self.child.kill() {
                debug!("Could not kill child process: {}", e);
            }
            if let Err(e) = self.child.wait() {
                warn!("Could not reap child process: {}", e);
            }
        }
    }
}

/// Log every line read from `reader`; the stream is closed when this returns
fn log_lines<R: Read>(reader: R) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end();
                if !line.is_empty() {
                    info!("{}", line);
                }
            }
            Err(e) => {
                warn!("Failed to read process output: {}", e);
                break;
            }
        }
    }
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Run a command with arguments in the current directory
    #[instrument(skip(self))]
    pub fn run_command(&self, command: &str, args: &[&str]) -> Result<()> {
        self.run_command_in(command, args, None)
    }

    /// Run a command with arguments, optionally in another working
    /// directory, streaming its combined output into the log
    #[instrument(skip(self))]
    pub fn run_command_in(&self, command: &str, args: &[&str], cwd: Option<&Path>) -> Result<()> {
        let cmd_str = std::iter::once(command)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");

        if self.debug {
            debug!("Running command: {}", cmd_str);
            if let Some(dir) = cwd {
                debug!("Working directory: {}", dir.display());
            }
        } else {
            info!("+ {}", cmd_str);
        }

        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child =
            ChildGuard::spawn(&mut cmd).map_err(|e| PackageError::spawn(cmd_str.clone(), e))?;

        let status = child
            .stream_to_log()
            .map_err(|e| PackageError::spawn(cmd_str.clone(), e))?;

        if !status.success() {
            let exit_code = status.code();
            return Err(PackageError::process(cmd_str, exit_code));
        }

        debug!("Command completed successfully");
        Ok(())
    }

    /// Check if a command exists in PATH (or, for a path, that it exists)
    #[instrument(skip(self))]
    pub fn command_exists(&self, command: &str) -> bool {
        match which::which(command) {
            Ok(path) => {
                debug!("Command '{}' resolved to {}", command, path.display());
                true
            }
            Err(e) => {
                debug!("Command '{}' not found: {}", command, e);
                false
            }
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(false)
    }
}
