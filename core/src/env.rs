use std::collections::HashMap;
use std::fmt::Debug;

/// Env is used to read environment variables while loading configuration.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the environment variable is found and is valid utf-8.
    /// - Returns `None` if the environment variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;
}

/// Implements Env for the OS context.
#[derive(Debug, Copy, Clone, Default)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// StaticEnv provides a fixed set of environment variables.
///
/// Useful in tests and for callers that resolve their settings elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The environment variables exposed by this env.
    pub envs: HashMap<String, String>,
}

impl StaticEnv {
    /// Create a StaticEnv from (key, value) pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            envs: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }
}
