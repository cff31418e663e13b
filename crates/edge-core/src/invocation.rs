//! # SDK Invocations
//!
//! A call to the SDK binary as data: program, discrete argument tokens,
//! working directory and where stdout goes. Nothing is ever joined into a
//! shell string, so values from the node list cannot inject commands and
//! tests can assert on the exact token list.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::config::EdgeConfig;
use crate::error::EdgeError;

/// Destination of the child's stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stdout {
    /// Shared with the helper's own stdout.
    Inherit,
    /// Truncated and written to a file.
    File(PathBuf),
}

/// A single invocation of the SDK binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkInvocation {
    program: PathBuf,
    args: Vec<String>,
    current_dir: PathBuf,
    stdout: Stdout,
}

impl SdkInvocation {
    /// Invoke `subcommand` of the configured binary inside the workspace.
    pub fn new(config: &EdgeConfig, subcommand: &str) -> Self {
        Self {
            program: config.binary_path(),
            args: vec![subcommand.to_string()],
            current_dir: config.workspace_dir.clone(),
            stdout: Stdout::Inherit,
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

    /// Write stdout to `path` instead of the terminal.
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Stdout::File(path.into());
        self
    }

    /// All tokens after the program, starting with the subcommand.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn subcommand(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn stdout(&self) -> &Stdout {
        &self.stdout
    }

    /// Run to completion. A non-zero exit is an error.
    pub fn run(&self) -> Result<(), EdgeError> {
        let mut command = self.command()?;
        if let Stdout::File(path) = &self.stdout {
            let file = File::create(path).map_err(EdgeError::io(path))?;
            command.stdout(Stdio::from(file));
        }

        debug!(invocation = %self, cwd = %self.current_dir().display(), "Running SDK");
        let status = command.status().map_err(EdgeError::io(&self.program))?;
        if !status.success() {
            return Err(EdgeError::SdkFailed {
                program: self.program_name(),
                subcommand: self.subcommand().to_string(),
                status,
            });
        }
        Ok(())
    }

    /// Start in the background with stdout and stderr appended to `log_path`.
    pub fn spawn_detached(&self, log_path: &Path) -> Result<Child, EdgeError> {
        let mut command = self.command()?;

        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(EdgeError::io(log_path))?;
        let log_err = log.try_clone().map_err(EdgeError::io(log_path))?;

        command
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err));

        debug!(
            invocation = %self,
            cwd = %self.current_dir().display(),
            log = %log_path.display(),
            "Spawning SDK"
        );
        command.spawn().map_err(EdgeError::io(&self.program))
    }

    fn command(&self) -> Result<Command, EdgeError> {
        if !self.program.is_file() {
            return Err(EdgeError::SdkMissing(self.program.clone()));
        }
        // Relative programs resolve differently once current_dir changes.
        let program = std::path::absolute(&self.program).map_err(EdgeError::io(&self.program))?;

        let mut command = Command::new(program);
        command.args(&self.args).current_dir(&self.current_dir);
        Ok(command)
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

impl fmt::Display for SdkInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Stdout::File(path) = &self.stdout {
            write!(f, " > {}", path.display())?;
        }
        Ok(())
    }
}
