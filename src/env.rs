use std::collections::HashMap;
use std::env as stdenv;

/// Snapshot of the process environment consulted by the prompt.
///
/// The clipboard lookup needs `PATH` and the display variables; the config
/// layer reads its fallbacks from here too. Tests build one by hand instead
/// of touching the real process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, WAYLAND_DISPLAY).
    pub vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process variables into a new `Environment`.
    pub fn new() -> Self {
        Self {
            vars: stdenv::vars().collect(),
        }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Like [`get_var`](Self::get_var) but treats an empty value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get_var(key).filter(|v| !v.trim().is_empty())
    }

    /// Set or override a variable in the snapshot.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}
