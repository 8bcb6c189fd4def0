use std::fmt;

use pixi_ci_platform::Command;
use tracing::{debug, info, warn};

use crate::lookup::EnvLookup;

const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Environment,
    GhCli,
}

/// A GitHub token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    secret: String,
    pub source: TokenSource,
}

impl Token {
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn into_secret(self) -> String {
        self.secret
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("secret", &"***")
            .field("source", &self.source)
            .finish()
    }
}

/// The explicit flag, then `GITHUB_TOKEN`, then `gh auth token`.
pub fn resolve_token(explicit: Option<&str>, env: &impl EnvLookup) -> Option<Token> {
    if let Some(secret) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return Some(Token {
            secret: secret.to_string(),
            source: TokenSource::Flag,
        });
    }
    if let Some(secret) = env.non_empty(GITHUB_TOKEN) {
        return Some(Token {
            secret,
            source: TokenSource::Environment,
        });
    }
    token_from_gh().map(|secret| Token {
        secret,
        source: TokenSource::GhCli,
    })
}

/// Ask an authenticated GitHub CLI for its token.
pub fn token_from_gh() -> Option<String> {
    let Ok(gh) = which::which("gh") else {
        debug!("GitHub CLI not found; skipping gh auth token lookup");
        return None;
    };

    let output = match Command::new(&gh).args(["auth", "token"]).capture() {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "failed to run GitHub CLI");
            return None;
        }
    };
    if !output.success() {
        warn!(code = ?output.code, "failed to obtain token via GitHub CLI");
        return None;
    }

    let token = output.stdout.trim();
    if token.is_empty() {
        warn!("GitHub CLI returned an empty token");
        return None;
    }
    info!("using token from GitHub CLI authentication");
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn flag_beats_environment() {
        let env = HashMap::from([(GITHUB_TOKEN.to_string(), "from-env".to_string())]);
        let token = resolve_token(Some("from-flag"), &env).unwrap();
        assert_eq!(token.secret(), "from-flag");
        assert_eq!(token.source, TokenSource::Flag);
    }

    #[test]
    fn blank_flag_falls_back_to_environment() {
        let env = HashMap::from([(GITHUB_TOKEN.to_string(), " from-env ".to_string())]);
        let token = resolve_token(Some(""), &env).unwrap();
        assert_eq!(token.secret(), "from-env");
        assert_eq!(token.source, TokenSource::Environment);
    }

    #[test]
    fn debug_hides_secret() {
        let env = HashMap::from([(GITHUB_TOKEN.to_string(), "hunter2".to_string())]);
        let token = resolve_token(None, &env).unwrap();
        assert!(!format!("{token:?}").contains("hunter2"));
    }
}
