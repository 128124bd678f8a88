//! Hook system: registry, dispatcher, dispatch stack and hook definitions.

mod bucket;
pub mod definitions;
pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod stack;

pub use definitions::BootstrapStage;
pub use handler::{AsyncFnHandler, FnHandler, HookCall, HookHandler};
pub use registry::HookRegistry;
pub use stack::DispatchStack;
