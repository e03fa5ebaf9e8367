// ABOUTME: Transformation task that produces the pipeline's final records
// ABOUTME: Uppercases validated records into the final output key

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::validate::VALIDATE_TASK_ID;
use super::{parse_config, TaskBuilder};
use crate::engine::error::Result;
use crate::engine::{Task, TaskDescriptor, TaskExecutionError, WorkflowContext};
use crate::parser::TaskDefinition;

pub const TRANSFORM_TASK_ID: &str = "transform_data";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default = "default_input_key")]
    pub input_key: String,
    #[serde(default = "default_output_key")]
    pub output_key: String,
}

fn default_input_key() -> String {
    "validated_data".to_string()
}

fn default_output_key() -> String {
    "final_data".to_string()
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            input_key: default_input_key(),
            output_key: default_output_key(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformTask {
    descriptor: TaskDescriptor,
    config: TransformConfig,
}

impl TransformTask {
    pub fn new() -> Self {
        Self::from_config(TransformConfig::default())
    }

    pub fn from_config(config: TransformConfig) -> Self {
        Self {
            descriptor: TaskDescriptor::new(TRANSFORM_TASK_ID, "Transform data")
                .depends_on([VALIDATE_TASK_ID]),
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
}

impl Default for TransformTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for TransformTask {
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
        info!(
            "Transforming '{}' into '{}'",
            self.config.input_key, self.config.output_key
        );

        let records: Vec<String> = context
            .get_as(&self.config.input_key)
            .map_err(|e| {
                TaskExecutionError::with_source(
                    format!("'{}' is not a list of records", self.config.input_key),
                    e,
                )
            })?
            .unwrap_or_default();

        let transformed: Vec<String> = records.iter().map(|r| r.to_uppercase()).collect();
        let transformed_count = transformed.len();

        context.insert(self.config.output_key.clone(), json!(transformed));

        Ok(json!({ "transformed_count": transformed_count }))
    }
}

pub struct TransformBuilder;

impl TaskBuilder for TransformBuilder {
    fn task_type(&self) -> &'static str {
        "transform"
    }

    fn build(&self, task_id: &str, definition: &TaskDefinition) -> Result<Box<dyn Task>> {
        let config: TransformConfig = parse_config(task_id, &definition.config)?;

        Ok(Box::new(
            TransformTask::from_config(config)
                .with_id(task_id)
                .with_name(definition.display_name(task_id))
                .with_dependencies(definition.depends_on.clone()),
        ))
    }
}
