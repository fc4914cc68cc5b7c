//! Environment lookup
//!
//! The resolver never touches `std::env` directly; it reads variables through
//! an [`EnvLookup`] captured at construction so callers can substitute a
//! fixed set of variables.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::sync::RwLock;

/// Read-only key/value lookup over environment variables
pub trait EnvLookup: Send + Sync + fmt::Debug {
    /// Value of `key`, or `None` when unset
    fn get(&self, key: &str) -> Option<String>;
}

/// The real process environment
///
/// A variable whose value is not valid UTF-8 is logged and treated as unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).and_then(|value| utf8_value(key, value))
    }
}

fn utf8_value(key: &str, value: OsString) -> Option<String> {
    match value.into_string() {
        Ok(value) => Some(value),
        Err(raw) => {
            tracing::warn!(variable = %key, value = ?raw, "Ignoring environment variable that is not valid UTF-8");
            None
        }
    }
}

/// An in-memory environment
///
/// Variables can be changed after the lookup has been handed to a resolver,
/// which makes it usable wherever the process environment would be.
#[derive(Debug, Default)]
pub struct StaticEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl StaticEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            vars: RwLock::new(vars),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut vars) = self.vars.write() {
            vars.insert(key.into(), value.into());
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut vars) = self.vars.write() {
            vars.remove(key);
        }
    }
}

impl EnvLookup for StaticEnv {
    fn get(&self, key: &str) -> Option<String> {
        match self.vars.read() {
            Ok(vars) => vars.get(key).cloned(),
            Err(_) => None,
        }
    }
}
