// ABOUTME: Workflow definition documents and their conversion into an orchestrator
// ABOUTME: Parses YAML definitions, checks their structure and registers their tasks

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::error::{ParserError, Result, ValidationError};
use super::task::TaskDefinition;
use crate::engine::Orchestrator;
use crate::tasks::TaskRegistry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Seed values for the run's shared data
    #[serde(default)]
    pub variables: HashMap<String, Value>,
    pub tasks: IndexMap<String, TaskDefinition>,
}

impl WorkflowDefinition {
    /// Parse a definition from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ParserError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse a definition from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let definition: WorkflowDefinition =
            serde_yaml::from_str(content).map_err(ParserError::YamlError)?;

        definition.validate_structure()?;

        Ok(definition)
    }

    /// Structural checks only; dependency existence and cycles are found at plan time
    fn validate_structure(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ParserError::MissingField("name".to_string()));
        }

        if self.tasks.is_empty() {
            return Err(ValidationError::EmptyWorkflow.into());
        }

        for (task_id, task) in &self.tasks {
            task.validate(task_id)?;
        }

        Ok(())
    }

    pub fn task_ids(&self) -> Vec<String> {
        self.tasks.keys().cloned().collect()
    }

    pub fn get_task(&self, task_id: &str) -> Option<&TaskDefinition> {
        self.tasks.get(task_id)
    }

    pub fn initial_data(&self) -> HashMap<String, Value> {
        self.variables.clone()
    }

    pub fn merge_variables(&mut self, vars: HashMap<String, Value>) {
        self.variables.extend(vars);
    }

    /// Build every task through `registry` and register them in file order
    pub fn build_orchestrator(
        &self,
        registry: &TaskRegistry,
    ) -> crate::engine::Result<Orchestrator> {
        let mut orchestrator = Orchestrator::new(self.name.clone());

        for (task_id, definition) in &self.tasks {
            let task = registry.build_task(task_id, definition)?;
            debug!("Built task {} of type {}", task_id, definition.task_type);
            orchestrator.add_boxed_task(task);
        }

        Ok(orchestrator)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ParserError::YamlError)
    }
}

#[derive(Debug, Clone)]
pub struct WorkflowParser;

impl WorkflowParser {
    pub fn new() -> Self {
        Self
    }

    pub async fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<WorkflowDefinition> {
        let content = fs::read_to_string(path.as_ref())
            .await
            .map_err(ParserError::IoError)?;
        self.parse_string(&content)
    }

    pub fn parse_string(&self, content: &str) -> Result<WorkflowDefinition> {
        WorkflowDefinition::from_yaml(content)
    }
}

impl Default for WorkflowParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PIPELINE: &str = r#"
name: data_pipeline
description: Extract, validate and transform

variables:
  batch_id: batch_001
  retries: 0

tasks:
  extract_data:
    type: extract
    name: Extract data
    config:
      source: warehouse
      record_count: 4

  validate_data:
    type: validate
    depends_on: [extract_data]

  transform_data:
    type: transform
    depends_on: [validate_data]
"#;

    #[test]
    fn test_parse_pipeline_definition() {
        let definition = WorkflowDefinition::from_yaml(PIPELINE).unwrap();

        assert_eq!(definition.name, "data_pipeline");
        assert_eq!(
            definition.task_ids(),
            vec!["extract_data", "validate_data", "transform_data"]
        );
        assert_eq!(
            definition.get_task("validate_data").unwrap().depends_on,
            vec!["extract_data"]
        );
        assert_eq!(definition.initial_data()["batch_id"], json!("batch_001"));
        assert_eq!(definition.initial_data()["retries"], json!(0));
    }

    #[test]
    fn test_build_orchestrator_in_file_order() {
        let definition = WorkflowDefinition::from_yaml(PIPELINE).unwrap();
        let orchestrator = definition
            .build_orchestrator(&TaskRegistry::new())
            .unwrap();

        assert_eq!(orchestrator.workflow_id(), "data_pipeline");
        assert_eq!(
            orchestrator.task_ids().collect::<Vec<_>>(),
            vec!["extract_data", "validate_data", "transform_data"]
        );
        assert_eq!(
            orchestrator.task("extract_data").unwrap().name(),
            "Extract data"
        );
    }

    #[test]
    fn test_unknown_dependency_parses() {
        let yaml = r#"
name: lazy
tasks:
  only:
    type: transform
    depends_on: [nowhere]
"#;

        assert!(WorkflowDefinition::from_yaml(yaml).is_ok());
    }

    #[test]
    fn test_validation_empty_name() {
        let yaml = r#"
name: ""
tasks:
  pull:
    type: extract
"#;

        assert!(matches!(
            WorkflowDefinition::from_yaml(yaml),
            Err(ParserError::MissingField(_))
        ));
    }

    #[test]
    fn test_validation_no_tasks() {
        let yaml = "name: empty\ntasks: {}\n";

        assert!(matches!(
            WorkflowDefinition::from_yaml(yaml),
            Err(ParserError::ValidationError(ValidationError::EmptyWorkflow))
        ));
    }

    #[test]
    fn test_definition_file_round_trip() {
        let definition = WorkflowDefinition::from_yaml(PIPELINE).unwrap();

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(definition.to_yaml().unwrap().as_bytes())
            .unwrap();

        let loaded = WorkflowDefinition::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.name, definition.name);
        assert_eq!(loaded.task_ids(), definition.task_ids());
    }
}
