//! Dispatch stack: the hooks currently being dispatched, outermost first.
//!
//! The stack is not shared registry state. Every dispatch runs inside a
//! task-local scope holding its ancestors plus its own hook, so dispatches
//! that interleave on one registry (joined futures or spawned tasks) each see
//! only their own nesting. Leaving the scope, by return, error, panic or drop,
//! is what pops the frame.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    static FRAMES: Vec<Frame>;
}

#[derive(Debug, Clone)]
struct Frame {
    owner: u64,
    hook: String,
}

/// View of the in-flight dispatches of one registry.
///
/// Frames pushed by other registries share the task-local but are filtered
/// out by owner.
#[derive(Debug)]
pub struct DispatchStack {
    owner: u64,
}

impl DispatchStack {
    /// Creates a stack view with a fresh owner token.
    pub fn new() -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Runs `fut` with `hook` pushed on top of the caller's stack.
    pub async fn within<F: Future>(&self, hook: &str, fut: F) -> F::Output {
        let mut frames = FRAMES.try_with(|frames| frames.clone()).unwrap_or_default();
        frames.push(Frame {
            owner: self.owner,
            hook: hook.to_string(),
        });
        FRAMES.scope(frames, fut).await
    }

    fn frames(&self) -> Vec<String> {
        FRAMES
            .try_with(|frames| {
                frames
                    .iter()
                    .filter(|frame| frame.owner == self.owner)
                    .map(|frame| frame.hook.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the innermost hook name.
    pub fn current(&self) -> Option<String> {
        self.frames().pop()
    }

    /// Returns whether `hook` is anywhere on the stack.
    pub fn contains(&self, hook: &str) -> bool {
        self.frames().iter().any(|frame| frame == hook)
    }

    /// Number of in-flight dispatches.
    pub fn depth(&self) -> usize {
        self.frames().len()
    }

    /// Returns a copy of the stack, outermost first.
    pub fn snapshot(&self) -> Vec<String> {
        self.frames()
    }
}

impl Default for DispatchStack {
    fn default() -> Self {
        Self::new()
    }
}
