use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the block service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Re-hash payloads on `put` and reject blocks whose identifier does not
    /// match. Off by default: callers are trusted to supply honest blocks.
    pub verify_on_put: bool,
    /// Re-hash blocks that arrive from the exchange before returning them.
    pub verify_fetched: bool,
    /// Upper bound on a single exchange fetch, in milliseconds.
    pub fetch_timeout_ms: Option<u64>,
    /// Upper bound on a single exchange announce, in milliseconds.
    pub announce_timeout_ms: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            verify_on_put: false,
            verify_fetched: true,
            fetch_timeout_ms: None,
            announce_timeout_ms: None,
        }
    }
}

impl ServiceConfig {
    /// A configuration that verifies every payload it handles.
    pub fn strict() -> Self {
        Self {
            verify_on_put: true,
            verify_fetched: true,
            ..Default::default()
        }
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    pub fn announce_timeout(&self) -> Option<Duration> {
        self.announce_timeout_ms.map(Duration::from_millis)
    }
}
