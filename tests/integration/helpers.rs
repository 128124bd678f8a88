//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use hookpress_hooks::prelude::async_trait;
use serde_json::Value;

use hookpress_core::result::AppResult;
use hookpress_hooks::{FnHandler, HookHandler, HookRegistry, Plugin, PluginInfo};

/// Ordered record of which callbacks ran.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Returns a copy of the entries.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Handler that records `label` each time it runs.
    pub fn recorder(&self, id: &str, label: &str) -> Arc<dyn HookHandler> {
        let log = self.clone();
        let label = label.to_string();
        FnHandler::wrap(id, move |_| {
            log.push(label.clone());
            Ok(Value::Null)
        })
    }
}

/// Plugin that records a line on each of the hooks it is given.
#[derive(Debug)]
pub struct RecordingPlugin {
    pub id: String,
    pub hooks: Vec<String>,
    pub log: CallLog,
}

impl RecordingPlugin {
    pub fn new(id: &str, hooks: &[&str], log: &CallLog) -> Arc<dyn Plugin> {
        Arc::new(Self {
            id: id.to_string(),
            hooks: hooks.iter().map(|h| h.to_string()).collect(),
            log: log.clone(),
        })
    }
}

#[async_trait]
impl Plugin for RecordingPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: self.id.clone(),
            name: self.id.clone(),
            version: "0.0.1".to_string(),
        }
    }

    async fn register(&self, hooks: &HookRegistry) -> AppResult<()> {
        self.log.push(format!("load:{}", self.id));
        for hook in &self.hooks {
            let handler = self
                .log
                .recorder(&format!("{}::{hook}", self.id), &format!("{}@{hook}", self.id));
            hooks.add_default(hook, handler)?;
        }
        Ok(())
    }
}
