//! Hook handlers: the callbacks plugins attach to hooks.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;

use hookpress_core::result::AppResult;

use super::registry::HookRegistry;

/// A single invocation of a handler.
///
/// `args` already holds the truncated argument list: at most as many leading
/// dispatch arguments as the handler declared when it was added. For filters
/// the first argument is the value being threaded through the chain.
#[derive(Debug)]
pub struct HookCall<'a> {
    /// Registry the hook is being dispatched on. Handlers use it to dispatch
    /// further hooks or to add/remove callbacks while the dispatch runs.
    pub registry: &'a HookRegistry,
    /// Name of the hook being dispatched.
    pub hook: &'a str,
    /// Priority bucket the handler was registered in.
    pub priority: i32,
    /// Arguments passed to this handler.
    pub args: Vec<Value>,
}

impl HookCall<'_> {
    /// Returns the argument at `index`, if it was passed.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Returns the filter value (first argument), or `Value::Null` when the
    /// handler accepts no arguments.
    pub fn value(&self) -> &Value {
        self.args.first().unwrap_or(&Value::Null)
    }

    /// Consumes the call and returns the filter value unchanged.
    pub fn into_value(mut self) -> Value {
        if self.args.is_empty() {
            Value::Null
        } else {
            self.args.swap_remove(0)
        }
    }
}

/// Trait for hook handler implementations.
///
/// `id()` is the callback's identity: two handlers with the same id are the
/// same callback for idempotent registration and for removal. For a method
/// bound to an object, the id should name both the object and the method.
#[async_trait]
pub trait HookHandler: Send + Sync + fmt::Debug {
    /// Returns the callback identity.
    fn id(&self) -> &str;

    /// Handles a hook invocation.
    ///
    /// For filters the returned value replaces the value passed to the next
    /// handler; for actions it is discarded. Errors propagate to the caller of
    /// the dispatch and abort it.
    async fn handle(&self, call: HookCall<'_>) -> AppResult<Value>;
}

/// Adapts a synchronous closure into a [`HookHandler`].
///
/// The closure receives the call by reference, so it can still add or remove
/// callbacks on `call.registry` while the hook is running.
pub struct FnHandler<F> {
    id: String,
    func: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&HookCall<'_>) -> AppResult<Value> + Send + Sync + 'static,
{
    /// Creates a new closure handler with the given callback identity.
    pub fn new(id: impl Into<String>, func: F) -> Self {
        Self {
            id: id.into(),
            func,
        }
    }

    /// Wraps the closure into an `Arc<dyn HookHandler>`.
    pub fn wrap(id: impl Into<String>, func: F) -> Arc<dyn HookHandler> {
        Arc::new(Self::new(id, func))
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").field("id", &self.id).finish()
    }
}

#[async_trait]
impl<F> HookHandler for FnHandler<F>
where
    F: Fn(&HookCall<'_>) -> AppResult<Value> + Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn handle(&self, call: HookCall<'_>) -> AppResult<Value> {
        (self.func)(&call)
    }
}

/// Adapts a closure returning a boxed future into a [`HookHandler`].
///
/// Use this when the callback has to await, most commonly to dispatch another
/// hook from inside a running one:
///
/// ```rust,ignore
/// let handler = AsyncFnHandler::wrap("audit::on_save", |call| {
///     Box::pin(async move {
///         call.registry.dispatch_action("audit_written", call.args).await?;
///         Ok(Value::Null)
///     })
/// });
/// ```
pub struct AsyncFnHandler<F> {
    id: String,
    func: F,
}

impl<F> AsyncFnHandler<F>
where
    F: for<'a> Fn(HookCall<'a>) -> BoxFuture<'a, AppResult<Value>> + Send + Sync + 'static,
{
    /// Creates a new async closure handler with the given callback identity.
    pub fn new(id: impl Into<String>, func: F) -> Self {
        Self {
            id: id.into(),
            func,
        }
    }

    /// Wraps the closure into an `Arc<dyn HookHandler>`.
    pub fn wrap(id: impl Into<String>, func: F) -> Arc<dyn HookHandler> {
        Arc::new(Self::new(id, func))
    }
}

impl<F> fmt::Debug for AsyncFnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFnHandler").field("id", &self.id).finish()
    }
}

#[async_trait]
impl<F> HookHandler for AsyncFnHandler<F>
where
    F: for<'a> Fn(HookCall<'a>) -> BoxFuture<'a, AppResult<Value>> + Send + Sync + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn handle(&self, call: HookCall<'_>) -> AppResult<Value> {
        (self.func)(call).await
    }
}
