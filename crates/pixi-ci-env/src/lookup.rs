use std::collections::HashMap;

/// Read access to environment variables.
pub trait EnvLookup {
    fn var(&self, key: &str) -> Option<String>;

    /// The trimmed value, or `None` if unset or blank.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// `top` shadows `base`.
#[derive(Debug, Clone)]
pub struct Layered<T, B> {
    pub top: T,
    pub base: B,
}

impl<T: EnvLookup, B: EnvLookup> Layered<T, B> {
    pub fn new(top: T, base: B) -> Self {
        Self { top, base }
    }
}

impl<T: EnvLookup, B: EnvLookup> EnvLookup for Layered<T, B> {
    fn var(&self, key: &str) -> Option<String> {
        self.top.var(key).or_else(|| self.base.var(key))
    }
}
