use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};

use tracing::debug;

use crate::error::{Error, Result};

/// Output of a finished child process, decoded as lossy UTF-8.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Builder around [`std::process::Command`] that always captures output.
#[derive(Debug)]
pub struct Command {
    inner: StdCommand,
    program: String,
}

impl Command {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        let program = program.as_ref();
        Self {
            inner: StdCommand::new(program),
            program: program.to_string_lossy().into_owned(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.inner.current_dir(dir);
        self
    }

    pub fn env_clear(mut self) -> Self {
        self.inner.env_clear();
        self
    }

    pub fn env<K, V>(mut self, key: K, val: V) -> Self
    where
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.inner.env(key, val);
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.inner.envs(vars);
        self
    }

    /// Human readable command line, for logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(
            self.inner
                .get_args()
                .map(|a| a.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args_vec(&self) -> Vec<OsString> {
        self.inner.get_args().map(OsStr::to_os_string).collect()
    }

    pub fn cwd(&self) -> Option<PathBuf> {
        self.inner.get_current_dir().map(Path::to_path_buf)
    }

    /// Run to completion and capture stdout and stderr.
    pub fn capture(mut self) -> Result<CapturedOutput> {
        let cmd = self.display();
        debug!(%cmd, cwd = ?self.cwd(), "running command");
        let output = self
            .inner
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::CommandFailed {
                cmd: cmd.clone(),
                source: e,
            })?;
        let captured = CapturedOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(%cmd, code = ?captured.code, "command finished");
        Ok(captured)
    }

    /// Run and fail unless the exit code is zero.
    pub fn checked(self) -> Result<CapturedOutput> {
        let cmd = self.display();
        let output = self.capture()?;
        if !output.success() {
            return Err(Error::NonZeroExit {
                cmd,
                code: output.code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}
