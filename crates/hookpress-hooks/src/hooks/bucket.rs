//! Per-hook callback storage and the mutation-safe traversal cursor.
//!
//! A hook owns priority buckets kept in ascending priority order. While at
//! least one dispatch of the hook is in flight, removals only set a
//! tombstone so every active cursor keeps valid indices; tombstoned entries
//! are swept once the last dispatch of the hook finishes.
//!
//! Visibility of callbacks added while a dispatch is running:
//! - added to a priority the cursor has already passed: not run in this pass
//! - added to the bucket the cursor is in: run, because new entries are
//!   appended at an index at or after the cursor
//! - added to a priority not reached yet: run

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use super::handler::HookHandler;

/// A registered callback.
#[derive(Debug)]
pub(crate) struct HookEntry {
    /// Registration sequence number, unique per registry.
    pub seq: u64,
    /// The handler.
    pub handler: Arc<dyn HookHandler>,
    /// Number of leading dispatch arguments passed to the handler.
    pub accepted_args: usize,
    /// Set when removed while the hook was mid-dispatch.
    pub removed: bool,
}

impl HookEntry {
    fn is_live(&self) -> bool {
        !self.removed
    }

    fn matches(&self, id: &str) -> bool {
        self.is_live() && self.handler.id() == id
    }
}

/// The next callback a cursor should invoke.
#[derive(Debug)]
pub(crate) struct Invocation {
    /// The handler to invoke.
    pub handler: Arc<dyn HookHandler>,
    /// Bucket priority.
    pub priority: i32,
    /// Number of leading dispatch arguments to pass.
    pub accepted_args: usize,
    /// Whether the callback was registered after the dispatch started.
    pub late: bool,
}

/// Position of one dispatch frame inside a hook's live buckets.
#[derive(Debug)]
pub(crate) struct Cursor {
    /// Bucket currently being walked, `None` before the first one.
    priority: Option<i32>,
    /// Index of the next entry to look at inside that bucket.
    index: usize,
    /// Registration sequence at frame start.
    watermark: u64,
}

impl Cursor {
    /// Creates a cursor positioned before the first bucket.
    pub fn new(watermark: u64) -> Self {
        Self {
            priority: None,
            index: 0,
            watermark,
        }
    }
}

/// All callbacks registered on one hook name.
#[derive(Debug, Default)]
pub(crate) struct Hook {
    /// Priority → entries in registration order.
    buckets: BTreeMap<i32, Vec<HookEntry>>,
    /// Number of dispatch frames currently iterating this hook.
    active_frames: usize,
}

impl Hook {
    /// Returns whether `id` is live at exactly `priority`.
    pub fn contains(&self, priority: i32, id: &str) -> bool {
        self.buckets
            .get(&priority)
            .is_some_and(|bucket| bucket.iter().any(|e| e.matches(id)))
    }

    /// Appends an entry to its bucket unless the same callback is already
    /// live there. Returns whether it was inserted.
    pub fn insert(&mut self, priority: i32, entry: HookEntry) -> bool {
        if self.contains(priority, entry.handler.id()) {
            return false;
        }
        self.buckets.entry(priority).or_default().push(entry);
        true
    }

    /// Removes `id` from `priority`. Returns whether a live entry was found.
    pub fn remove(&mut self, priority: i32, id: &str) -> bool {
        let dispatching = self.is_dispatching();
        let Some(bucket) = self.buckets.get_mut(&priority) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|e| e.matches(id)) else {
            return false;
        };

        if dispatching {
            bucket[pos].removed = true;
        } else {
            bucket.remove(pos);
            if bucket.is_empty() {
                self.buckets.remove(&priority);
            }
        }
        true
    }

    /// Removes every live entry, or only those in one bucket.
    /// Returns how many were removed.
    pub fn remove_all(&mut self, priority: Option<i32>) -> usize {
        let dispatching = self.is_dispatching();
        let mut removed = 0;

        for (p, bucket) in self.buckets.iter_mut() {
            if priority.is_some_and(|wanted| wanted != *p) {
                continue;
            }
            for entry in bucket.iter_mut().filter(|e| e.is_live()) {
                entry.removed = true;
                removed += 1;
            }
        }

        if !dispatching {
            self.sweep();
        }
        removed
    }

    /// Returns the lowest priority at which `id` is live.
    pub fn priority_of(&self, id: &str) -> Option<i32> {
        self.buckets
            .iter()
            .find(|(_, bucket)| bucket.iter().any(|e| e.matches(id)))
            .map(|(priority, _)| *priority)
    }

    /// Number of live callbacks.
    pub fn live_count(&self) -> usize {
        self.buckets
            .values()
            .map(|bucket| bucket.iter().filter(|e| e.is_live()).count())
            .sum()
    }

    /// Returns whether any live callback is registered.
    pub fn has_live(&self) -> bool {
        self.buckets
            .values()
            .any(|bucket| bucket.iter().any(HookEntry::is_live))
    }

    /// Returns whether a dispatch of this hook is in flight.
    pub fn is_dispatching(&self) -> bool {
        self.active_frames > 0
    }

    /// Returns whether the hook can be dropped from the registry.
    pub fn is_disposable(&self) -> bool {
        !self.is_dispatching() && self.buckets.is_empty()
    }

    /// Marks the start of a dispatch frame.
    pub fn enter(&mut self) {
        self.active_frames += 1;
    }

    /// Marks the end of a dispatch frame; the last one out sweeps tombstones.
    pub fn leave(&mut self) {
        self.active_frames = self.active_frames.saturating_sub(1);
        if self.active_frames == 0 {
            self.sweep();
        }
    }

    /// Advances `cursor` to the next live entry and returns it.
    ///
    /// Walks the live buckets, so entries appended to the current or a later
    /// bucket after the cursor was created are still reached. Buckets below
    /// the cursor's priority are never revisited.
    pub fn next(&self, cursor: &mut Cursor) -> Option<Invocation> {
        loop {
            if let Some((priority, bucket)) = cursor
                .priority
                .and_then(|p| self.buckets.get(&p).map(|bucket| (p, bucket)))
            {
                while let Some(entry) = bucket.get(cursor.index) {
                    cursor.index += 1;
                    if entry.is_live() {
                        return Some(Invocation {
                            handler: entry.handler.clone(),
                            priority,
                            accepted_args: entry.accepted_args,
                            late: entry.seq >= cursor.watermark,
                        });
                    }
                }
            }

            let next_priority = match cursor.priority {
                None => self.buckets.keys().next().copied(),
                Some(current) => self
                    .buckets
                    .range((Bound::Excluded(current), Bound::Unbounded))
                    .next()
                    .map(|(priority, _)| *priority),
            }?;
            cursor.priority = Some(next_priority);
            cursor.index = 0;
        }
    }

    /// Physically drops tombstoned entries and empty buckets.
    fn sweep(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.retain(HookEntry::is_live);
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
    }
}
