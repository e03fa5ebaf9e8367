// ABOUTME: Built-in task implementations and the registry that builds tasks by type
// ABOUTME: Contains the extract, validate and transform pipeline stages

pub mod extract;
pub mod transform;
pub mod validate;

pub use extract::{ExtractConfig, ExtractTask};
pub use transform::{TransformConfig, TransformTask};
pub use validate::{ValidateConfig, ValidateTask};

use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::engine::error::{ExecutionError, Result};
use crate::engine::{Orchestrator, Task};
use crate::parser::TaskDefinition;

/// Builds a task of one type from a definition file entry.
pub trait TaskBuilder: Send + Sync {
    fn task_type(&self) -> &'static str;

    fn build(&self, task_id: &str, definition: &TaskDefinition) -> Result<Box<dyn Task>>;
}

pub struct TaskRegistry {
    builders: HashMap<String, Box<dyn TaskBuilder>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        let mut registry = Self::empty();

        // Register all built-in task builders
        registry.register(Box::new(extract::ExtractBuilder));
        registry.register(Box::new(validate::ValidateBuilder));
        registry.register(Box::new(transform::TransformBuilder));

        registry
    }

    pub fn empty() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    pub fn register(&mut self, builder: Box<dyn TaskBuilder>) {
        let task_type = builder.task_type().to_string();
        self.builders.insert(task_type, builder);
    }

    pub fn get_builder(&self, task_type: &str) -> Option<&dyn TaskBuilder> {
        self.builders.get(task_type).map(|builder| builder.as_ref())
    }

    pub fn build_task(&self, task_id: &str, definition: &TaskDefinition) -> Result<Box<dyn Task>> {
        match self.get_builder(&definition.task_type) {
            Some(builder) => builder.build(task_id, definition),
            None => Err(ExecutionError::TaskNotSupported {
                task_type: definition.task_type.clone(),
            }),
        }
    }

    /// Supported task types, sorted
    pub fn list_supported_tasks(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.builders.keys().map(|k| k.as_str()).collect();
        types.sort_unstable();
        types
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The stock extract -> validate -> transform pipeline, registered in stage order
pub fn data_pipeline(workflow_id: impl Into<String>, source: impl Into<String>) -> Orchestrator {
    Orchestrator::new(workflow_id)
        .with_task(ExtractTask::new(source))
        .with_task(ValidateTask::new())
        .with_task(TransformTask::new())
}

/// Deserialize a task's `config` block; an absent block yields the defaults
pub(crate) fn parse_config<T>(task_id: &str, config: &serde_yaml::Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if config.is_null() {
        return Ok(T::default());
    }

    serde_yaml::from_value(config.clone()).map_err(|e| ExecutionError::InvalidConfiguration {
        task_id: task_id.to_string(),
        reason: e.to_string(),
    })
}
