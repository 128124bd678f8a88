//! Request bootstrap: loads plugins and fires the lifecycle stages.

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use hookpress_core::config::plugin::PluginConfig;
use hookpress_core::result::AppResult;

use crate::hooks::definitions::{BootstrapStage, ENABLE_ADVANCED_CACHE_FILTER};
use crate::hooks::registry::HookRegistry;
use crate::registry::PluginRegistry;

/// Outcome of a bootstrap run.
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    /// Result of the advanced cache filter.
    pub advanced_cache: bool,
    /// Must-use plugins loaded, in order.
    pub must_use_loaded: Vec<String>,
    /// Regular plugins loaded, in order.
    pub plugins_loaded: Vec<String>,
    /// Stages fired, in order.
    pub stages: Vec<BootstrapStage>,
}

/// Drives plugin loading and the bootstrap stages for one registry.
#[derive(Debug)]
pub struct Bootstrap<'a> {
    hooks: &'a HookRegistry,
    plugins: &'a PluginRegistry,
}

impl<'a> Bootstrap<'a> {
    /// Creates a bootstrap over the given registries.
    pub fn new(hooks: &'a HookRegistry, plugins: &'a PluginRegistry) -> Self {
        Self { hooks, plugins }
    }

    /// Runs the full bootstrap sequence.
    ///
    /// Must-use plugins load before `muplugins_loaded`, regular plugins
    /// before `plugins_loaded`, then the remaining stages fire in order. The
    /// first error, from a plugin or a callback, stops the sequence.
    pub async fn run(&self, config: &PluginConfig) -> AppResult<BootstrapReport> {
        let advanced_cache = self
            .hooks
            .dispatch_filter(ENABLE_ADVANCED_CACHE_FILTER, Value::Bool(true), Vec::new())
            .await?
            .as_bool()
            .unwrap_or(false);

        let must_use_loaded = self.plugins.load(&config.must_use, self.hooks).await?;
        let mut stages = Vec::with_capacity(BootstrapStage::ALL.len());
        self.fire(BootstrapStage::MuPluginsLoaded, &mut stages).await?;

        let plugins_loaded = self.plugins.load(&config.enabled, self.hooks).await?;
        for stage in &BootstrapStage::ALL[1..] {
            self.fire(*stage, &mut stages).await?;
        }

        info!(
            must_use = must_use_loaded.len(),
            plugins = plugins_loaded.len(),
            advanced_cache = advanced_cache,
            "Bootstrap complete"
        );

        Ok(BootstrapReport {
            advanced_cache,
            must_use_loaded,
            plugins_loaded,
            stages,
        })
    }

    async fn fire(&self, stage: BootstrapStage, fired: &mut Vec<BootstrapStage>) -> AppResult<()> {
        info!(
            stage = %stage,
            callbacks = self.hooks.callback_count(stage.as_str()),
            "Firing bootstrap stage"
        );
        self.hooks.dispatch_action(stage.as_str(), Vec::new()).await?;
        fired.push(stage);
        Ok(())
    }
}
