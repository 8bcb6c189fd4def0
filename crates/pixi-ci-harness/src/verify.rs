use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use pixi_ci_env::BackendOverride;
use pixi_ci_platform::Command;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::exit::ExitCode;

static ANSI_ESCAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").ok());

/// Remove terminal color and cursor sequences.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(text, ""),
        None => Cow::Borrowed(text),
    }
}

/// A finished command.
#[derive(Debug, Clone)]
pub struct Output {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command: {}", self.command)
    }
}

/// Expectations for one command invocation.
///
/// `PIXI_NO_WRAP=1` is always set so diagnostics are not wrapped.
#[derive(Debug, Clone)]
pub struct Verify {
    program: OsString,
    args: Vec<OsString>,
    env: Vec<(OsString, OsString)>,
    cwd: Option<PathBuf>,
    reset_env: bool,
    strip_ansi: bool,
    expected: ExitCode,
    stdout_contains: Vec<String>,
    stdout_excludes: Vec<String>,
    stderr_contains: Vec<String>,
    stderr_excludes: Vec<String>,
}

impl Verify {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            reset_env: false,
            strip_ansi: false,
            expected: ExitCode::Success,
            stdout_contains: Vec::new(),
            stdout_excludes: Vec::new(),
            stderr_contains: Vec::new(),
            stderr_excludes: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.env
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Have pixi use local backend executables through `PIXI_BUILD_BACKEND_OVERRIDE`.
    pub fn backend_override(self, backends: &BackendOverride) -> Self {
        self.env(BackendOverride::ENV_VAR, backends.env_value())
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Start from an empty environment instead of the inherited one.
    pub fn reset_env(mut self) -> Self {
        self.reset_env = true;
        self
    }

    pub fn strip_ansi(mut self) -> Self {
        self.strip_ansi = true;
        self
    }

    pub fn expect(mut self, code: ExitCode) -> Self {
        self.expected = code;
        self
    }

    pub fn stdout_contains(mut self, needle: impl Into<String>) -> Self {
        self.stdout_contains.push(needle.into());
        self
    }

    pub fn stdout_excludes(mut self, needle: impl Into<String>) -> Self {
        self.stdout_excludes.push(needle.into());
        self
    }

    pub fn stderr_contains(mut self, needle: impl Into<String>) -> Self {
        self.stderr_contains.push(needle.into());
        self
    }

    pub fn stderr_excludes(mut self, needle: impl Into<String>) -> Self {
        self.stderr_excludes.push(needle.into());
        self
    }

    /// Run the command and check every expectation.
    pub fn run(self) -> Result<Output> {
        let mut command = Command::new(&self.program).args(&self.args);
        if let Some(cwd) = &self.cwd {
            command = command.current_dir(cwd);
        }
        if self.reset_env {
            command = command.env_clear();
        }
        let command = command
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .env("PIXI_NO_WRAP", "1");
        let shown = command.display();
        let captured = command.capture()?;

        let (stdout, stderr) = if self.strip_ansi {
            (
                strip_ansi(&captured.stdout).into_owned(),
                strip_ansi(&captured.stderr).into_owned(),
            )
        } else {
            (captured.stdout, captured.stderr)
        };
        debug!(command = %shown, %stdout, %stderr, code = ?captured.code, "command finished");

        if !self.expected.matches(captured.code) {
            return Err(Error::ExitCode {
                command: shown,
                actual: captured.code,
                expected: self.expected,
                stderr,
            });
        }
        check_stream("stdout", &stdout, &self.stdout_contains, &self.stdout_excludes)?;
        check_stream("stderr", &stderr, &self.stderr_contains, &self.stderr_excludes)?;

        Ok(Output {
            command: shown,
            stdout,
            stderr,
            code: captured.code,
        })
    }
}

fn check_stream(
    stream: &'static str,
    haystack: &str,
    contains: &[String],
    excludes: &[String],
) -> Result<()> {
    if let Some(needle) = contains.iter().find(|n| !haystack.contains(n.as_str())) {
        return Err(Error::Missing {
            stream,
            needle: needle.clone(),
            haystack: haystack.to_string(),
        });
    }
    if let Some(needle) = excludes.iter().find(|n| haystack.contains(n.as_str())) {
        return Err(Error::Unexpected {
            stream,
            needle: needle.clone(),
            haystack: haystack.to_string(),
        });
    }
    Ok(())
}

/// Run `verify`, panicking with the mismatch description on failure.
#[track_caller]
pub fn verify_cli_command(verify: Verify) -> Output {
    match verify.run() {
        Ok(output) => output,
        Err(e) => panic!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_ansi("\x1b[1;32mok\x1b[0m done"), "ok done");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn stream_checks() {
        let contains = vec!["hello".to_string()];
        let excludes = vec!["error".to_string()];
        check_stream("stdout", "hello world", &contains, &excludes).unwrap();

        let err = check_stream("stdout", "bye", &contains, &[]).unwrap_err();
        assert!(matches!(err, Error::Missing { stream: "stdout", .. }));

        let err = check_stream("stderr", "an error", &[], &excludes).unwrap_err();
        assert!(err.to_string().contains("unexpectedly found in stderr"));
    }
}
