// ABOUTME: Common utilities and helpers for integration tests
// ABOUTME: Provides test tasks, workflow file builders and temporary test environments

#![allow(dead_code)]

pub mod strategies;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;

use switchyard::engine::{Task, TaskDescriptor, TaskExecutionError, WorkflowContext};

/// Appends its id to the shared `trail` list and optionally writes one more key
pub struct RecordingTask {
    descriptor: TaskDescriptor,
    writes: Option<(String, Value)>,
    fail_with: Option<String>,
}

impl RecordingTask {
    pub fn new(id: &str) -> Self {
        Self {
            descriptor: TaskDescriptor::new(id, format!("Recording task {}", id)),
            writes: None,
            fail_with: None,
        }
    }

    pub fn after(mut self, dependencies: &[&str]) -> Self {
        self.descriptor = self.descriptor.depends_on(dependencies.iter().copied());
        self
    }

    pub fn writing(mut self, key: &str, value: Value) -> Self {
        self.writes = Some((key.to_string(), value));
        self
    }

    /// Fail after making its writes
    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }
}

#[async_trait]
impl Task for RecordingTask {
    fn task_id(&self) -> &str {
        &self.descriptor.id
    }

    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn dependencies(&self) -> &[String] {
        &self.descriptor.dependencies
    }

    async fn execute(&self, context: &mut WorkflowContext) -> Result<Value, TaskExecutionError> {
        let mut trail: Vec<String> = context.get_as("trail")?.unwrap_or_default();
        trail.push(self.descriptor.id.clone());
        context.insert("trail", json!(trail));

        if let Some((key, value)) = &self.writes {
            context.insert(key.clone(), value.clone());
        }

        if let Some(message) = &self.fail_with {
            return Err(TaskExecutionError::new(message.clone()));
        }

        Ok(json!({ "ran": self.descriptor.id }))
    }
}

/// Read the `trail` left by recording tasks
pub fn trail(context: &WorkflowContext) -> Vec<String> {
    context
        .get_as("trail")
        .expect("trail should be a list of ids")
        .unwrap_or_default()
}

pub struct TestWorkflowBuilder {
    name: String,
    description: String,
    variables: Vec<(String, String)>,
    tasks: Vec<TestTask>,
}

pub struct TestTask {
    pub id: String,
    pub task_type: String,
    pub depends_on: Vec<String>,
    pub config: Vec<(String, String)>,
}

impl TestWorkflowBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("Test workflow: {}", name),
            variables: Vec::new(),
            tasks: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// `value` is written as raw YAML
    pub fn with_variable(mut self, key: &str, value: &str) -> Self {
        self.variables.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_task(mut self, task: TestTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn add_task(mut self, id: &str, task_type: &str, depends_on: Vec<&str>) -> Self {
        self.tasks.push(TestTask {
            id: id.to_string(),
            task_type: task_type.to_string(),
            depends_on: depends_on.into_iter().map(|s| s.to_string()).collect(),
            config: Vec::new(),
        });
        self
    }

    /// Set a raw YAML config entry on the most recently added task
    pub fn with_config(mut self, key: &str, value: &str) -> Self {
        if let Some(task) = self.tasks.last_mut() {
            task.config.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// The stock extract, validate and transform stages
    pub fn add_pipeline(self, record_count: usize) -> Self {
        self.add_task("extract_data", "extract", vec![])
            .with_config("record_count", &record_count.to_string())
            .add_task("validate_data", "validate", vec!["extract_data"])
            .add_task("transform_data", "transform", vec!["validate_data"])
    }

    pub async fn write_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, self.generate_yaml()).await?;
        Ok(())
    }

    pub fn generate_yaml(&self) -> String {
        let mut yaml = format!(
            "name: {}\ndescription: \"{}\"\n\n",
            self.name, self.description
        );

        if !self.variables.is_empty() {
            yaml.push_str("variables:\n");
            for (key, value) in &self.variables {
                yaml.push_str(&format!("  {}: {}\n", key, value));
            }
            yaml.push('\n');
        }

        yaml.push_str("tasks:\n");
        for task in &self.tasks {
            yaml.push_str(&format!("  {}:\n", task.id));
            yaml.push_str(&format!("    type: {}\n", task.task_type));

            if !task.depends_on.is_empty() {
                yaml.push_str("    depends_on:\n");
                for dep in &task.depends_on {
                    yaml.push_str(&format!("      - {}\n", dep));
                }
            }

            if !task.config.is_empty() {
                yaml.push_str("    config:\n");
                for (key, value) in &task.config {
                    yaml.push_str(&format!("      {}: {}\n", key, value));
                }
            }

            yaml.push('\n');
        }

        yaml
    }
}

pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn workflow_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}.yaml", name))
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.path().join(format!("{}_output.json", name))
    }

    pub async fn create_workflow_file(&self, name: &str, builder: &TestWorkflowBuilder) -> PathBuf {
        let workflow_file = self.workflow_file(name);
        builder
            .write_to_file(&workflow_file)
            .await
            .expect("Failed to write workflow file");
        workflow_file
    }

    pub async fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, content)
            .await
            .expect("Failed to write test file");
        path
    }
}
