// ABOUTME: Completion report produced at the end of every workflow run
// ABOUTME: Summarises completed, failed and never-attempted tasks with a success ratio

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use super::status::{RunState, TaskState, TaskStatus};

/// The task that stopped a run, with the error it reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFailure {
    pub task_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub workflow_id: String,
    pub run_id: String,
    pub plan: Vec<String>,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub outcome: RunState,
    pub failure: Option<TaskFailure>,
    pub tasks: Vec<TaskState>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,
}

impl ExecutionReport {
    /// Fraction of registered tasks that completed. An empty workflow counts as fully completed.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn success_percentage(&self) -> f64 {
        self.success_rate() * 100.0
    }

    pub fn is_success(&self) -> bool {
        self.outcome == RunState::AllCompleted
    }

    pub fn task_status(&self, task_id: &str) -> Option<TaskStatus> {
        self.tasks
            .iter()
            .find(|state| state.task_id == task_id)
            .map(|state| state.status)
    }

    /// Emit the report as a log event
    pub fn log(&self) {
        match &self.failure {
            None => info!(
                workflow_id = %self.workflow_id,
                run_id = %self.run_id,
                "Execution report: {} (duration: {:?})",
                self,
                self.duration
            ),
            Some(failure) => warn!(
                workflow_id = %self.workflow_id,
                run_id = %self.run_id,
                failed_task = %failure.task_id,
                "Execution report: {} - halted after '{}' failed: {}",
                self,
                failure.task_id,
                failure.message
            ),
        }
    }
}

impl std::fmt::Display for ExecutionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} tasks completed ({:.1}%)",
            self.completed,
            self.total,
            self.success_percentage()
        )
    }
}
