//! Hook registry: callbacks registered by hook name with priority ordering.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

use hookpress_core::config::hooks::HookConfig;
use hookpress_core::error::AppError;
use hookpress_core::result::AppResult;

use super::bucket::{Hook, HookEntry};
use super::handler::HookHandler;
use super::stack::DispatchStack;

/// Registry of hook callbacks organized by hook name.
///
/// A dispatch runs its callbacks one after another; nested dispatch happens
/// from inside a running callback. Several dispatches may be in flight on one
/// registry at once (joined futures, spawned tasks): each keeps its own
/// dispatch stack, and removals are swept once the last of them leaves the
/// hook. Hooks are created on first registration.
#[derive(Debug)]
pub struct HookRegistry {
    /// Hook name → priority buckets.
    pub(crate) hooks: DashMap<String, Hook>,
    /// Hook name → number of times it was dispatched as an action.
    pub(crate) fired: DashMap<String, u64>,
    /// Hooks currently being dispatched.
    pub(crate) stack: DispatchStack,
    /// Next registration sequence number.
    pub(crate) sequence: AtomicU64,
    /// Defaults and limits.
    pub(crate) config: HookConfig,
}

impl HookRegistry {
    /// Creates a new empty hook registry with default settings.
    pub fn new() -> Self {
        Self::with_config(&HookConfig::default())
    }

    /// Creates a new empty hook registry using the given settings.
    pub fn with_config(config: &HookConfig) -> Self {
        Self {
            hooks: DashMap::new(),
            fired: DashMap::new(),
            stack: DispatchStack::new(),
            sequence: AtomicU64::new(0),
            config: config.clone(),
        }
    }

    /// Returns the registry settings.
    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Registers `handler` on `hook` at `priority`.
    ///
    /// The handler receives at most `accepted_args` leading dispatch
    /// arguments. Registering the same callback id again at the same priority
    /// is a no-op that keeps the original position; `Ok(false)` is returned
    /// in that case.
    pub fn add(
        &self,
        hook: &str,
        handler: Arc<dyn HookHandler>,
        priority: i32,
        accepted_args: usize,
    ) -> AppResult<bool> {
        if hook.is_empty() {
            return Err(AppError::invalid_argument("Hook name must not be empty"));
        }
        if handler.id().is_empty() {
            return Err(AppError::invalid_argument(format!(
                "Callback id must not be empty (hook '{hook}')"
            )));
        }

        let callback = handler.id().to_string();
        let entry = HookEntry {
            seq: self.sequence.fetch_add(1, Ordering::Relaxed),
            handler,
            accepted_args,
            removed: false,
        };

        let inserted = self
            .hooks
            .entry(hook.to_string())
            .or_default()
            .insert(priority, entry);

        debug!(
            hook = %hook,
            callback = %callback,
            priority = priority,
            accepted_args = accepted_args,
            inserted = inserted,
            "Hook callback registered"
        );

        Ok(inserted)
    }

    /// Registers `handler` using the configured default priority and
    /// accepted argument count.
    pub fn add_default(&self, hook: &str, handler: Arc<dyn HookHandler>) -> AppResult<bool> {
        self.add(
            hook,
            handler,
            self.config.default_priority,
            self.config.default_accepted_args,
        )
    }

    /// Removes the callback `id` registered on `hook` at `priority`.
    ///
    /// Safe to call from inside a running callback, including one of the same
    /// hook: a callback not yet reached by the running dispatch will not run.
    pub fn remove(&self, hook: &str, id: &str, priority: i32) -> bool {
        let removed = self
            .hooks
            .get_mut(hook)
            .is_some_and(|mut entry| entry.remove(priority, id));

        if removed {
            self.hooks.remove_if(hook, |_, h| h.is_disposable());
            debug!(
                hook = %hook,
                callback = %id,
                priority = priority,
                "Hook callback removed"
            );
        }

        removed
    }

    /// Removes the callback `id` registered on `hook` at the configured
    /// default priority.
    pub fn remove_default(&self, hook: &str, id: &str) -> bool {
        self.remove(hook, id, self.config.default_priority)
    }

    /// Removes every callback on `hook`, or only those at `priority`.
    ///
    /// Returns the number of callbacks removed.
    pub fn remove_all(&self, hook: &str, priority: Option<i32>) -> usize {
        let removed = self
            .hooks
            .get_mut(hook)
            .map(|mut entry| entry.remove_all(priority))
            .unwrap_or(0);

        self.hooks.remove_if(hook, |_, h| h.is_disposable());

        if removed > 0 {
            debug!(
                hook = %hook,
                priority = ?priority,
                removed = removed,
                "Hook callbacks removed"
            );
        }

        removed
    }

    /// Returns whether any callback is registered on `hook`.
    pub fn exists(&self, hook: &str) -> bool {
        self.hooks.get(hook).is_some_and(|entry| entry.has_live())
    }

    /// Returns the priority at which callback `id` is registered on `hook`.
    ///
    /// When the callback is registered at several priorities, the lowest one
    /// is returned.
    pub fn exists_callback(&self, hook: &str, id: &str) -> Option<i32> {
        self.hooks.get(hook).and_then(|entry| entry.priority_of(id))
    }

    /// Returns the number of callbacks registered on `hook`.
    pub fn callback_count(&self, hook: &str) -> usize {
        self.hooks
            .get(hook)
            .map(|entry| entry.live_count())
            .unwrap_or(0)
    }

    /// Returns the names of all hooks with at least one callback.
    pub fn registered_hooks(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .hooks
            .iter()
            .filter(|entry| entry.value().has_live())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Returns how many times `hook` was dispatched as an action.
    pub fn fired_count(&self, hook: &str) -> u64 {
        self.fired.get(hook).map(|count| *count).unwrap_or(0)
    }

    /// Returns the hook whose callbacks are running right now.
    pub fn current_hook(&self) -> Option<String> {
        self.stack.current()
    }

    /// Returns whether `hook` is being dispatched, at any nesting level.
    /// With `None`, returns whether any hook is being dispatched.
    pub fn is_dispatching(&self, hook: Option<&str>) -> bool {
        match hook {
            Some(name) => self.stack.contains(name),
            None => self.stack.depth() > 0,
        }
    }

    /// Returns the in-flight hook names, outermost first.
    pub fn dispatch_stack(&self) -> Vec<String> {
        self.stack.snapshot()
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
