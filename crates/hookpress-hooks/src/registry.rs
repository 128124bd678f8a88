//! Plugin registry: stores compiled-in plugins and loads them onto a
//! hook registry in a caller-chosen order.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use hookpress_core::error::AppError;
use hookpress_core::result::AppResult;

use crate::hooks::registry::HookRegistry;

/// Metadata about a plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin identifier.
    pub id: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
}

/// Trait that all plugins must implement.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Returns plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Attaches the plugin's callbacks to `hooks`.
    async fn register(&self, hooks: &HookRegistry) -> AppResult<()>;
}

/// Registry of all available plugins.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Plugin ID → plugin instance.
    plugins: RwLock<HashMap<String, Arc<dyn Plugin>>>,
    /// IDs of loaded plugins, in load order.
    loaded: RwLock<Vec<String>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a plugin available for loading.
    pub async fn register(&self, plugin: Arc<dyn Plugin>) -> AppResult<()> {
        let info = plugin.info();
        let mut plugins = self.plugins.write().await;

        if plugins.contains_key(&info.id) {
            return Err(AppError::plugin(format!(
                "Plugin '{}' is already registered",
                info.id
            )));
        }

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            "Registering plugin"
        );

        plugins.insert(info.id, plugin);
        Ok(())
    }

    /// Loads the plugins named by `ids`, in order, onto `hooks`.
    ///
    /// Unknown and already loaded IDs are skipped with a warning. A plugin
    /// that fails to register aborts the load. Returns the IDs loaded by
    /// this call.
    pub async fn load(&self, ids: &[String], hooks: &HookRegistry) -> AppResult<Vec<String>> {
        let mut newly_loaded = Vec::new();

        for id in ids {
            if self.is_loaded(id).await {
                warn!(plugin_id = %id, "Plugin already loaded, skipping");
                continue;
            }

            let Some(plugin) = self.get(id).await else {
                warn!(plugin_id = %id, "Plugin not found, skipping");
                continue;
            };

            plugin.register(hooks).await.map_err(|e| {
                AppError::with_source(
                    e.kind,
                    format!("Plugin '{id}' failed to register: {}", e.message),
                    e,
                )
            })?;

            self.loaded.write().await.push(id.clone());
            newly_loaded.push(id.clone());

            info!(plugin_id = %id, "Plugin loaded");
        }

        Ok(newly_loaded)
    }

    /// Gets a plugin by ID.
    pub async fn get(&self, plugin_id: &str) -> Option<Arc<dyn Plugin>> {
        let plugins = self.plugins.read().await;
        plugins.get(plugin_id).cloned()
    }

    /// Lists all registered plugin metadata, sorted by ID.
    pub async fn list(&self) -> Vec<PluginInfo> {
        let plugins = self.plugins.read().await;
        let mut infos: Vec<PluginInfo> = plugins.values().map(|p| p.info()).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Checks whether a plugin has been loaded.
    pub async fn is_loaded(&self, plugin_id: &str) -> bool {
        let loaded = self.loaded.read().await;
        loaded.iter().any(|id| id == plugin_id)
    }

    /// Returns the IDs of loaded plugins, in load order.
    pub async fn loaded(&self) -> Vec<String> {
        self.loaded.read().await.clone()
    }
}
