// ABOUTME: Workflow orchestrator that registers tasks, plans and runs them in order
// ABOUTME: Threads one context through the plan, tracks status and halts on the first failure

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use super::context::WorkflowContext;
use super::dependency::{self, ExecutionPlan};
use super::error::{ExecutionError, Result};
use super::report::{ExecutionReport, TaskFailure};
use super::status::{RunState, TaskState, TaskStatus};
use super::task::Task;

struct RegisteredTask {
    task: Box<dyn Task>,
    state: TaskState,
}

/// Owns a set of tasks keyed by id, in registration order.
///
/// Plan building is lazy: dependencies may name tasks registered later, and
/// cycles or unknown ids only surface from [`Orchestrator::build_execution_plan`]
/// or [`Orchestrator::execute`].
pub struct Orchestrator {
    workflow_id: String,
    tasks: IndexMap<String, RegisteredTask>,
    run_state: RunState,
    last_report: Option<ExecutionReport>,
}

impl Orchestrator {
    pub fn new(workflow_id: impl Into<String>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            tasks: IndexMap::new(),
            run_state: RunState::NotStarted,
            last_report: None,
        }
    }

    /// Register a task, replacing any earlier task with the same id
    pub fn add_task<T: Task + 'static>(&mut self, task: T) -> &mut Self {
        self.add_boxed_task(Box::new(task))
    }

    pub fn add_boxed_task(&mut self, task: Box<dyn Task>) -> &mut Self {
        let task_id = task.task_id().to_string();
        let state = TaskState::new(task_id.clone());

        // A replaced id keeps its original registration slot
        if self
            .tasks
            .insert(task_id.clone(), RegisteredTask { task, state })
            .is_some()
        {
            debug!("Replaced task registration: {}", task_id);
        } else {
            debug!("Registered task: {}", task_id);
        }

        self
    }

    pub fn with_task<T: Task + 'static>(mut self, task: T) -> Self {
        self.add_task(task);
        self
    }

    /// Compute the order in which the registered tasks will run
    pub fn build_execution_plan(&self) -> Result<ExecutionPlan> {
        let tasks: Vec<&dyn Task> = self
            .tasks
            .values()
            .map(|entry| entry.task.as_ref())
            .collect();

        dependency::build_execution_plan(&tasks)
    }

    /// Run every planned task once, in order, and return the final context.
    ///
    /// Plan errors are returned before any task runs. A task failure is
    /// recorded as `Failed`, stops the walk, and is reported through the
    /// execution report rather than returned.
    #[instrument(skip(self, initial_data), fields(workflow_id = %self.workflow_id))]
    pub async fn execute(
        &mut self,
        initial_data: Option<HashMap<String, Value>>,
    ) -> Result<WorkflowContext> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        self.run_state = RunState::NotStarted;

        info!(
            "Starting workflow execution: {} (run_id: {})",
            self.workflow_id, run_id
        );

        let mut context = WorkflowContext::new(self.workflow_id.clone());
        if let Some(data) = initial_data {
            context.extend(data);
        }

        let plan = self.build_execution_plan()?;
        self.run_state = RunState::PlanBuilt;
        info!("Execution plan: {} ({} tasks)", plan, plan.len());

        for entry in self.tasks.values_mut() {
            entry.state = TaskState::new(entry.task.task_id().to_string());
        }

        self.run_state = RunState::Running;
        let mut completed_tasks: HashSet<String> = HashSet::new();
        let mut failure = None;

        for task_id in &plan {
            let entry = self
                .tasks
                .get_mut(task_id)
                .ok_or_else(|| ExecutionError::TaskNotFound {
                    task_id: task_id.clone(),
                })?;

            debug_assert!(entry.task.can_execute(&completed_tasks));
            entry.state.mark_running()?;
            info!("Executing task: {} ({})", task_id, entry.task.name());

            match entry.task.execute(&mut context).await {
                Ok(output) => {
                    context.record_result(task_id, output);
                    entry.state.mark_completed()?;
                    completed_tasks.insert(task_id.clone());
                    info!("Task {} completed successfully", task_id);
                }
                Err(err) => {
                    let message = err.to_string();
                    error!("Task {} failed: {}", task_id, message);
                    entry.state.mark_failed(message.clone())?;
                    failure = Some(TaskFailure {
                        task_id: task_id.clone(),
                        message,
                    });
                    break;
                }
            }
        }

        self.run_state = if failure.is_some() {
            RunState::HaltedOnFailure
        } else {
            RunState::AllCompleted
        };

        let report = self.build_report(run_id, plan, started_at, failure);
        report.log();
        self.last_report = Some(report);

        Ok(context)
    }

    fn build_report(
        &self,
        run_id: String,
        plan: ExecutionPlan,
        started_at: DateTime<Utc>,
        failure: Option<TaskFailure>,
    ) -> ExecutionReport {
        let count = |status: TaskStatus| {
            self.tasks
                .values()
                .filter(|entry| entry.state.status == status)
                .count()
        };
        let finished_at = Utc::now();

        ExecutionReport {
            workflow_id: self.workflow_id.clone(),
            run_id,
            plan: plan.into_task_ids(),
            total: self.tasks.len(),
            completed: count(TaskStatus::Completed),
            failed: count(TaskStatus::Failed),
            pending: count(TaskStatus::Pending),
            outcome: self.run_state,
            failure,
            tasks: self
                .tasks
                .values()
                .map(|entry| entry.state.clone())
                .collect(),
            started_at,
            finished_at,
            duration: (finished_at - started_at)
                .to_std()
                .unwrap_or(Duration::ZERO),
        }
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered task ids in registration order
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn task(&self, task_id: &str) -> Option<&dyn Task> {
        self.tasks.get(task_id).map(|entry| entry.task.as_ref())
    }

    pub fn status(&self, task_id: &str) -> Option<TaskStatus> {
        self.tasks.get(task_id).map(|entry| entry.state.status)
    }

    pub fn task_state(&self, task_id: &str) -> Option<&TaskState> {
        self.tasks.get(task_id).map(|entry| &entry.state)
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Report of the most recent run that got past plan building
    pub fn last_report(&self) -> Option<&ExecutionReport> {
        self.last_report.as_ref()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("workflow_id", &self.workflow_id)
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .field("run_state", &self.run_state)
            .finish()
    }
}
