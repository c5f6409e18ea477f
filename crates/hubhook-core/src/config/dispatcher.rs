//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the hook dispatcher and its administrative surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Priority given to registrations that do not specify one.
    #[serde(default = "default_priority")]
    pub default_priority: i32,
    /// Minimum user class allowed to run administrative commands.
    #[serde(default = "default_admin_class")]
    pub admin_class: i32,
    /// First word of an administrative hub command.
    #[serde(default = "default_admin_command")]
    pub admin_command: String,
    /// Whether handler panics are caught and counted as failures.
    #[serde(default = "default_true")]
    pub catch_panics: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            admin_class: default_admin_class(),
            admin_command: default_admin_command(),
            catch_panics: true,
        }
    }
}

fn default_priority() -> i32 {
    100
}

fn default_admin_class() -> i32 {
    10
}

fn default_admin_command() -> String {
    "dispatcher".to_string()
}

fn default_true() -> bool {
    true
}
