//! Status lines for people watching the terminal. Diagnostics go through `tracing`.

use std::fmt::Display;

use console::{Term, style};

pub fn success(msg: impl Display) {
    line(style("✓").green().bold(), msg);
}

pub fn warning(msg: impl Display) {
    line(style("!").yellow().bold(), msg);
}

pub fn failure(msg: impl Display) {
    line(style("✗").red().bold(), msg);
}

fn line(mark: impl Display, msg: impl Display) {
    // A closed stderr is not worth failing over.
    let _ = Term::stderr().write_line(&format!("{mark} {msg}"));
}

/// Progress bars only make sense on an interactive terminal.
pub fn interactive() -> bool {
    Term::stderr().is_term()
}
