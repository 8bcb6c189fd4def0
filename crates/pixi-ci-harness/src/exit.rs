use std::fmt;

/// Exit codes `pixi` is expected to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Failure = 1,
    IncorrectUsage = 2,
    CommandNotFound = 127,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn matches(self, actual: Option<i32>) -> bool {
        actual == Some(self.code())
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?} ({})", self.code())
    }
}
