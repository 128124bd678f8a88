//! Hook registry configuration.

use serde::{Deserialize, Serialize};

/// Defaults applied by the hook registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Priority used when a caller does not pick one (lower runs first).
    #[serde(default = "default_priority")]
    pub default_priority: i32,
    /// Number of leading dispatch arguments a callback receives by default.
    #[serde(default = "default_accepted_args")]
    pub default_accepted_args: usize,
    /// Maximum nesting of in-flight dispatches. Unlimited when absent.
    #[serde(default)]
    pub max_dispatch_depth: Option<usize>,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            default_priority: default_priority(),
            default_accepted_args: default_accepted_args(),
            max_dispatch_depth: None,
        }
    }
}

fn default_priority() -> i32 {
    10
}

fn default_accepted_args() -> usize {
    1
}
