// ABOUTME: Extraction task that seeds the pipeline with raw records
// ABOUTME: Generates a fixed-size batch of records from a named source into shared data

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{parse_config, TaskBuilder};
use crate::engine::error::{ExecutionError, Result};
use crate::engine::{Task, TaskDescriptor, TaskExecutionError, WorkflowContext};
use crate::parser::TaskDefinition;

pub const EXTRACT_TASK_ID: &str = "extract_data";

/// Upper bound on `record_count`; larger batches are rejected rather than allocated
pub const MAX_RECORD_COUNT: usize = 1_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_record_count")]
    pub record_count: usize,
    #[serde(default = "default_output_key")]
    pub output_key: String,
}

fn default_source() -> String {
    "database".to_string()
}

fn default_record_count() -> usize {
    10
}

fn default_output_key() -> String {
    "raw_data".to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            record_count: default_record_count(),
            output_key: default_output_key(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractTask {
    descriptor: TaskDescriptor,
    config: ExtractConfig,
}

impl ExtractTask {
    pub fn new(source: impl Into<String>) -> Self {
        Self::from_config(ExtractConfig {
            source: source.into(),
            ..ExtractConfig::default()
        })
    }

    pub fn from_config(config: ExtractConfig) -> Self {
        Self {
            descriptor: TaskDescriptor::new(EXTRACT_TASK_ID, "Extract data"),
            config,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.descriptor.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.name = name.into();
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.descriptor.dependencies = dependencies;
        self
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }
}

#[async_trait]
impl Task for ExtractTask {
    fn task_id(&self) -> &str {
        &self.descriptor.id
    }

    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn dependencies(&self) -> &[String] {
        &self.descriptor.dependencies
    }

    async fn execute(
        &self,
        context: &mut WorkflowContext,
    ) -> std::result::Result<Value, TaskExecutionError> {
        if self.config.record_count > MAX_RECORD_COUNT {
            return Err(TaskExecutionError::new(format!(
                "record_count {} exceeds the maximum of {}",
                self.config.record_count, MAX_RECORD_COUNT
            )));
        }

        info!(
            "Extracting {} records from {}",
            self.config.record_count, self.config.source
        );

        let records: Vec<String> = (0..self.config.record_count)
            .map(|i| format!("record_{}", i))
            .collect();
        let count = records.len();

        context.insert(self.config.output_key.clone(), json!(records));

        Ok(json!({ "count": count }))
    }
}

pub struct ExtractBuilder;

impl TaskBuilder for ExtractBuilder {
    fn task_type(&self) -> &'static str {
        "extract"
    }

    fn build(&self, task_id: &str, definition: &TaskDefinition) -> Result<Box<dyn Task>> {
        let config: ExtractConfig = parse_config(task_id, &definition.config)?;

        if config.record_count > MAX_RECORD_COUNT {
            return Err(ExecutionError::InvalidConfiguration {
                task_id: task_id.to_string(),
                reason: format!(
                    "record_count {} exceeds the maximum of {}",
                    config.record_count, MAX_RECORD_COUNT
                ),
            });
        }

        Ok(Box::new(
            ExtractTask::from_config(config)
                .with_id(task_id)
                .with_name(definition.display_name(task_id))
                .with_dependencies(definition.depends_on.clone()),
        ))
    }
}
