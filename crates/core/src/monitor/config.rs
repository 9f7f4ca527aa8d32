//! Monitor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum polling interval the runtime will honor, regardless of
/// configuration. Hammering the storefront faster buys nothing and risks
/// the account.
pub const MIN_INTERVAL_SECS: u64 = 5;

/// Configuration for the availability monitor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonitorConfig {
    /// Enable the monitor loop. When disabled, callers run one-shot
    /// attempts instead.
    #[serde(default)]
    pub enabled: bool,

    /// Seconds between availability checks.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

fn default_interval() -> u64 {
    30
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_seconds: default_interval(),
        }
    }
}

impl MonitorConfig {
    /// The configured interval with the floor applied.
    pub fn effective_interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(MIN_INTERVAL_SECS))
    }
}
