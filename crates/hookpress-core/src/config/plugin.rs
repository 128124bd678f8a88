//! Plugin loading configuration.

use serde::{Deserialize, Serialize};

/// Which compiled-in plugins are loaded, and in which order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Must-use plugins, loaded before `muplugins_loaded` fires.
    #[serde(default)]
    pub must_use: Vec<String>,
    /// Regular plugins, loaded before `plugins_loaded` fires.
    #[serde(default)]
    pub enabled: Vec<String>,
}
