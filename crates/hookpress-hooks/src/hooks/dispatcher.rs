//! Hook dispatcher: runs the callbacks of a hook in priority order.
//!
//! Actions discard callback return values. Filters thread a value through
//! the chain: each callback's return becomes the value the next one sees.
//!
//! Dispatch is re-entrant. Every dispatch owns a [`Cursor`] over the live
//! buckets of its hook, so a callback can dispatch the same hook again, or
//! add and remove callbacks, without disturbing the outer pass.
//!
//! Callback errors are not caught. The first error aborts the dispatch and
//! every enclosing one and is returned unchanged.

use std::sync::atomic::Ordering;

use serde_json::Value;
use tracing::{debug, trace, warn};

use hookpress_core::error::AppError;
use hookpress_core::result::AppResult;

use super::bucket::{Cursor, Invocation};
use super::handler::HookCall;
use super::registry::HookRegistry;

/// Hold on a hook while one of its dispatches is walking the buckets.
///
/// Dropping the frame releases the hook, so removals made during the
/// dispatch are swept when a callback errors, panics, or the dispatch future
/// is dropped half way. The dispatch stack entry lives in the surrounding
/// task-local scope and goes away with it.
struct DispatchFrame<'a> {
    registry: &'a HookRegistry,
    hook: &'a str,
}

impl<'a> DispatchFrame<'a> {
    fn enter(registry: &'a HookRegistry, hook: &'a str) -> Self {
        if let Some(mut entry) = registry.hooks.get_mut(hook) {
            entry.enter();
        }
        Self { registry, hook }
    }
}

impl Drop for DispatchFrame<'_> {
    fn drop(&mut self) {
        if let Some(mut entry) = self.registry.hooks.get_mut(self.hook) {
            entry.leave();
        }
        self.registry
            .hooks
            .remove_if(self.hook, |_, h| h.is_disposable());
    }
}

impl HookRegistry {
    /// Dispatches `hook` as an action.
    ///
    /// Every callback receives `min(accepted_args, args.len())` leading
    /// arguments; return values are discarded. Cheap no-op when nothing is
    /// registered.
    pub async fn dispatch_action(&self, hook: &str, args: Vec<Value>) -> AppResult<()> {
        *self.fired.entry(hook.to_string()).or_insert(0) += 1;

        if !self.exists(hook) {
            return Ok(());
        }

        let mut args = args;
        self.run(hook, &mut args, false).await
    }

    /// Dispatches `hook` as a filter and returns the transformed value.
    ///
    /// Each callback receives `value` followed by `extra` arguments, truncated
    /// to its accepted argument count. Returns `value` unchanged when nothing
    /// is registered.
    pub async fn dispatch_filter(
        &self,
        hook: &str,
        value: Value,
        extra: Vec<Value>,
    ) -> AppResult<Value> {
        if !self.exists(hook) {
            return Ok(value);
        }

        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(value);
        args.extend(extra);

        self.run(hook, &mut args, true).await?;
        Ok(args.swap_remove(0))
    }

    /// Pushes `hook` on the dispatch stack and walks its callbacks.
    async fn run(&self, hook: &str, args: &mut [Value], thread_value: bool) -> AppResult<()> {
        if let Some(limit) = self.config.max_dispatch_depth {
            if self.stack.depth() >= limit {
                return Err(AppError::recursion_limit(format!(
                    "Dispatching '{hook}' would exceed the maximum depth of {limit}"
                )));
            }
        }

        self.stack
            .within(hook, self.walk(hook, args, thread_value))
            .await
    }

    /// Walks the callbacks of `hook`. With `thread_value`, the first argument
    /// is replaced by each callback's return value.
    async fn walk(&self, hook: &str, args: &mut [Value], thread_value: bool) -> AppResult<()> {
        let _frame = DispatchFrame::enter(self, hook);
        let mut cursor = Cursor::new(self.sequence.load(Ordering::Relaxed));

        debug!(
            hook = %hook,
            depth = self.stack.depth(),
            callbacks = self.callback_count(hook),
            "Dispatching hook"
        );

        while let Some(invocation) = self.next_invocation(hook, &mut cursor) {
            let Invocation {
                handler,
                priority,
                accepted_args,
                late,
            } = invocation;

            trace!(
                hook = %hook,
                callback = %handler.id(),
                priority = priority,
                late = late,
                "Invoking hook callback"
            );

            let take = accepted_args.min(args.len());
            let call = HookCall {
                registry: self,
                hook,
                priority,
                args: args[..take].to_vec(),
            };

            let output = handler.handle(call).await.map_err(|e| {
                warn!(
                    hook = %hook,
                    callback = %handler.id(),
                    priority = priority,
                    error = %e,
                    "Hook callback failed, aborting dispatch"
                );
                e
            })?;

            if thread_value {
                args[0] = output;
            }
        }

        Ok(())
    }

    fn next_invocation(&self, hook: &str, cursor: &mut Cursor) -> Option<Invocation> {
        let entry = self.hooks.get(hook)?;
        entry.next(cursor)
    }
}
