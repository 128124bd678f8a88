//! # hookpress-hooks
//!
//! Action/filter hook engine for HookPress. Provides:
//!
//! - Hook registry with priority-ordered, idempotent registration
//! - Re-entrant action and filter dispatch that tolerates callbacks adding
//!   and removing callbacks mid-dispatch
//! - Dispatch stack introspection (current hook, nesting)
//! - Plugin registry and the request bootstrap sequence
//! - Admin-post request routing

pub mod admin_post;
pub mod bootstrap;
pub mod hooks;
pub mod macros;
pub mod prelude;
pub mod registry;

pub use admin_post::route_admin_post;
pub use bootstrap::{Bootstrap, BootstrapReport};
pub use hooks::{AsyncFnHandler, BootstrapStage, FnHandler, HookCall, HookHandler, HookRegistry};
pub use registry::{Plugin, PluginInfo, PluginRegistry};
