// ABOUTME: Task entries of a workflow definition file
// ABOUTME: Names the registry type, dependencies and free-form config of one task

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub config: serde_yaml::Value,
}

impl TaskDefinition {
    /// Explicit name, falling back to the task id
    pub fn display_name(&self, task_id: &str) -> String {
        self.name.clone().unwrap_or_else(|| task_id.to_string())
    }

    pub(crate) fn validate(&self, task_id: &str) -> Result<(), ValidationError> {
        if task_id.trim().is_empty() {
            return Err(ValidationError::InvalidTaskDefinition {
                task: task_id.to_string(),
                reason: "task id cannot be empty".to_string(),
            });
        }

        if self.task_type.trim().is_empty() {
            return Err(ValidationError::InvalidTaskDefinition {
                task: task_id.to_string(),
                reason: "type cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
