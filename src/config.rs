use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning knobs for the caches. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Epsilon closures memoized per `ClosureCache`; zero disables memoization.
    pub closure_cache_capacity: usize,
    /// Lifetime of an `AcceptCache` entry, in seconds.
    pub result_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            closure_cache_capacity: 1024,
            result_ttl_secs: 30 * 60,
        }
    }
}

impl Config {
    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing configuration")
    }
}
