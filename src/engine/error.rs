// ABOUTME: Error types for plan building, task execution and state bookkeeping
// ABOUTME: Defines the scheduler-level error enum and the task-level execution error

use serde::Serialize;
use thiserror::Error;

use super::status::TaskStatus;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Cyclic dependency detected: no runnable task among {unresolved:?}{}", describe_diagnostics(.cycles, .missing))]
    CyclicDependency {
        unresolved: Vec<String>,
        cycles: Vec<Vec<String>>,
        missing: Vec<MissingDependency>,
    },

    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    #[error("Task type not supported: {task_type}")]
    TaskNotSupported { task_type: String },

    #[error("Invalid task configuration: {task_id} - {reason}")]
    InvalidConfiguration { task_id: String, reason: String },

    #[error("Invalid status transition for task {task_id}: {from} -> {to}")]
    InvalidTransition {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
}

pub type Result<T> = std::result::Result<T, ExecutionError>;

/// A dependency that names a task id nobody registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependency {
    pub task_id: String,
    pub dependency: String,
}

/// The single error channel a task uses to report failure.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TaskExecutionError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TaskExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying cause with a task-level message
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for TaskExecutionError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(format!("Context data error: {}", err), err)
    }
}

impl ExecutionError {
    pub fn is_cyclic_dependency(&self) -> bool {
        matches!(self, ExecutionError::CyclicDependency { .. })
    }
}

fn describe_diagnostics(cycles: &[Vec<String>], missing: &[MissingDependency]) -> String {
    let mut details = String::new();

    for cycle in cycles {
        details.push_str(&format!("; cycle: {}", cycle.join(" <-> ")));
    }

    for entry in missing {
        details.push_str(&format!(
            "; '{}' depends on unregistered task '{}'",
            entry.task_id, entry.dependency
        ));
    }

    details
}
