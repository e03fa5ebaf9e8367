// ABOUTME: Validation task that filters extracted records
// ABOUTME: Keeps records carrying the expected marker and publishes them for later stages

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::extract::EXTRACT_TASK_ID;
use super::{parse_config, TaskBuilder};
use crate::engine::error::Result;
use crate::engine::{Task, TaskDescriptor, TaskExecutionError, WorkflowContext};
use crate::parser::TaskDefinition;

pub const VALIDATE_TASK_ID: &str = "validate_data";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateConfig {
    #[serde(default = "default_input_key")]
    pub input_key: String,
    #[serde(default = "default_output_key")]
    pub output_key: String,
    #[serde(default = "default_marker")]
    pub marker: String,
}

fn default_input_key() -> String {
    "raw_data".to_string()
}

fn default_output_key() -> String {
    "validated_data".to_string()
}

fn default_marker() -> String {
    "record".to_string()
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            input_key: default_input_key(),
            output_key: default_output_key(),
            marker: default_marker(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidateTask {
    descriptor: TaskDescriptor,
    config: ValidateConfig,
}

impl ValidateTask {
    pub fn new() -> Self {
        Self::from_config(ValidateConfig::default())
    }

    pub fn from_config(config: ValidateConfig) -> Self {
        Self {
            descriptor: TaskDescriptor::new(VALIDATE_TASK_ID, "Validate data")
                .depends_on([EXTRACT_TASK_ID]),
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

impl Default for ValidateTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for ValidateTask {
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
        info!("Validating records in '{}'", self.config.input_key);

        // An absent input is treated as an empty batch
        let records: Vec<String> = context
            .get_as(&self.config.input_key)
            .map_err(|e| {
                TaskExecutionError::with_source(
                    format!("'{}' is not a list of records", self.config.input_key),
                    e,
                )
            })?
            .unwrap_or_default();

        let total = records.len();
        let valid: Vec<String> = records
            .into_iter()
            .filter(|record| record.contains(self.config.marker.as_str()))
            .collect();
        let valid_count = valid.len();

        debug!("{} of {} records passed validation", valid_count, total);
        context.insert(self.config.output_key.clone(), json!(valid));

        Ok(json!({ "valid_count": valid_count }))
    }
}

pub struct ValidateBuilder;

impl TaskBuilder for ValidateBuilder {
    fn task_type(&self) -> &'static str {
        "validate"
    }

    fn build(&self, task_id: &str, definition: &TaskDefinition) -> Result<Box<dyn Task>> {
        let config: ValidateConfig = parse_config(task_id, &definition.config)?;

        Ok(Box::new(
            ValidateTask::from_config(config)
                .with_id(task_id)
                .with_name(definition.display_name(task_id))
                .with_dependencies(definition.depends_on.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_filters_by_marker() {
        let mut context = WorkflowContext::new("wf");
        context.insert("raw_data", json!(["record_0", "garbage", "record_1"]));

        let output = ValidateTask::new().execute(&mut context).await.unwrap();

        assert_eq!(
            context.get("validated_data"),
            Some(&json!(["record_0", "record_1"]))
        );
        assert_eq!(output, json!({ "valid_count": 2 }));
    }

    #[tokio::test]
    async fn test_validate_missing_input_is_empty() {
        let mut context = WorkflowContext::new("wf");

        let output = ValidateTask::new().execute(&mut context).await.unwrap();

        assert_eq!(context.get("validated_data"), Some(&json!([])));
        assert_eq!(output, json!({ "valid_count": 0 }));
    }

    #[tokio::test]
    async fn test_validate_rejects_non_list_input() {
        let mut context = WorkflowContext::new("wf");
        context.insert("raw_data", 42);

        let err = ValidateTask::new().execute(&mut context).await.unwrap_err();

        assert!(err.message().contains("raw_data"));
        assert!(!context.contains_key("validated_data"));
    }

    #[test]
    fn test_validate_depends_on_extract() {
        assert_eq!(ValidateTask::new().dependencies(), [EXTRACT_TASK_ID]);
    }
}
