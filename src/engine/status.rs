// ABOUTME: Task lifecycle states and per-task state bookkeeping
// ABOUTME: Defines TaskStatus transitions, TaskState records and the run-level state machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{ExecutionError, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Within one run a task only moves forward: Pending -> Running -> Completed | Failed
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Running)
                | (TaskStatus::Running, TaskStatus::Completed)
                | (TaskStatus::Running, TaskStatus::Failed)
        )
    }
}

/// Where a single `execute` call currently is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    NotStarted,
    PlanBuilt,
    Running,
    AllCompleted,
    HaltedOnFailure,
}

impl RunState {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::AllCompleted | RunState::HaltedOnFailure)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskState {
    pub task_id: String,
    pub status: TaskStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl TaskState {
    pub fn new(task_id: String) -> Self {
        Self {
            task_id,
            status: TaskStatus::Pending,
            start_time: None,
            end_time: None,
            last_error: None,
        }
    }

    pub fn mark_running(&mut self) -> Result<()> {
        self.transition(TaskStatus::Running)?;
        self.start_time = Some(Utc::now());
        Ok(())
    }

    pub fn mark_completed(&mut self) -> Result<()> {
        self.transition(TaskStatus::Completed)?;
        self.end_time = Some(Utc::now());
        Ok(())
    }

    pub fn mark_failed(&mut self, error: String) -> Result<()> {
        self.transition(TaskStatus::Failed)?;
        self.end_time = Some(Utc::now());
        self.last_error = Some(error);
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    fn transition(&mut self, next: TaskStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(ExecutionError::InvalidTransition {
                task_id: self.task_id.clone(),
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        Ok(())
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::NotStarted => write!(f, "not_started"),
            RunState::PlanBuilt => write!(f, "plan_built"),
            RunState::Running => write!(f, "running"),
            RunState::AllCompleted => write!(f, "all_completed"),
            RunState::HaltedOnFailure => write!(f, "halted_on_failure"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_state_lifecycle() {
        let mut state = TaskState::new("task_1".to_string());
        assert_eq!(state.status, TaskStatus::Pending);
        assert!(!state.is_finished());

        state.mark_running().unwrap();
        assert_eq!(state.status, TaskStatus::Running);
        assert!(state.start_time.is_some());

        state.mark_completed().unwrap();
        assert_eq!(state.status, TaskStatus::Completed);
        assert!(state.end_time.is_some());
        assert!(state.is_finished());
    }

    #[test]
    fn test_failed_state_records_error() {
        let mut state = TaskState::new("task_1".to_string());
        state.mark_running().unwrap();
        state.mark_failed("boom".to_string()).unwrap();

        assert_eq!(state.status, TaskStatus::Failed);
        assert_eq!(state.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        let mut state = TaskState::new("task_1".to_string());
        assert!(state.mark_completed().is_err());

        state.mark_running().unwrap();
        assert!(state.mark_running().is_err());

        state.mark_completed().unwrap();
        let err = state.mark_failed("late".to_string()).unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::InvalidTransition {
                from: TaskStatus::Completed,
                to: TaskStatus::Failed,
                ..
            }
        ));
        assert_eq!(state.status, TaskStatus::Completed);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(TaskStatus::Pending.to_string(), "pending");
        assert_eq!(TaskStatus::Failed.to_string(), "failed");
        assert_eq!(RunState::HaltedOnFailure.to_string(), "halted_on_failure");
    }
}
