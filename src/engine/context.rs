// ABOUTME: Shared workflow context threaded through every task of a run
// ABOUTME: Carries the shared data bus and the per-task result records

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The evolving state of one workflow run.
///
/// Tasks read and write `shared_data` freely. `task_results` is written only
/// by the orchestrator, which stores each task's returned output under that
/// task's own id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowContext {
    workflow_id: String,
    shared_data: BTreeMap<String, Value>,
    task_results: BTreeMap<String, Value>,
}

impl WorkflowContext {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            shared_data: BTreeMap::new(),
            task_results: BTreeMap::new(),
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.shared_data.get(key)
    }

    /// Read a shared value as a concrete type. `Ok(None)` when the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> serde_json::Result<Option<T>> {
        self.shared_data
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
    }

    /// Insert or overwrite a shared value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.shared_data.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.shared_data.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.shared_data.contains_key(key)
    }

    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.shared_data.extend(entries);
    }

    pub fn shared_data(&self) -> &BTreeMap<String, Value> {
        &self.shared_data
    }

    pub fn task_result(&self, task_id: &str) -> Option<&Value> {
        self.task_results.get(task_id)
    }

    pub fn task_results(&self) -> &BTreeMap<String, Value> {
        &self.task_results
    }

    pub(crate) fn record_result(&mut self, task_id: &str, output: Value) {
        self.task_results.insert(task_id.to_string(), output);
    }
}
