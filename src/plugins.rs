//! Plugins compiled into the host.

use hookpress_hooks::prelude::*;

/// ID of the [`LifecycleLog`] plugin.
pub const LIFECYCLE_LOG_ID: &str = "lifecycle-log";

/// Logs every bootstrap stage after all other callbacks of the stage ran.
#[derive(Debug)]
pub struct LifecycleLog;

#[async_trait]
impl Plugin for LifecycleLog {
    fn info(&self) -> PluginInfo {
        plugin_info!(id: LIFECYCLE_LOG_ID, name: "Lifecycle Log")
    }

    async fn register(&self, hooks: &HookRegistry) -> AppResult<()> {
        for stage in BootstrapStage::ALL {
            let handler = FnHandler::wrap("lifecycle_log::stage_done", move |call| {
                tracing::info!(
                    stage = %stage,
                    fired = call.registry.fired_count(call.hook),
                    "Stage complete"
                );
                Ok(Value::Null)
            });
            hooks.add(stage.as_str(), handler, i32::MAX, 0)?;
        }
        Ok(())
    }
}
