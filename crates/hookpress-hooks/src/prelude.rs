//! Prelude for convenient imports.

pub use async_trait::async_trait;
pub use futures::future::BoxFuture;
pub use serde_json::{Value, json};

pub use hookpress_core::error::AppError;
pub use hookpress_core::result::AppResult;

pub use crate::hooks::definitions::BootstrapStage;
pub use crate::hooks::handler::{AsyncFnHandler, FnHandler, HookCall, HookHandler};
pub use crate::hooks::registry::HookRegistry;
pub use crate::registry::{Plugin, PluginInfo, PluginRegistry};

pub use crate::plugin_info;
