//! Console host configuration.

use serde::{Deserialize, Serialize};

/// Settings for the stdin-driven console host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Interval between `OnTimer` ticks in milliseconds. `0` disables the tick.
    #[serde(default = "default_timer_interval")]
    pub timer_interval_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            timer_interval_ms: default_timer_interval(),
        }
    }
}

fn default_timer_interval() -> u64 {
    1000
}
