// ABOUTME: Scheduling engine module for the switchyard orchestrator
// ABOUTME: Task contracts, dependency planning and the sequential run loop

pub mod context;
pub mod dependency;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod status;
pub mod task;

pub use context::WorkflowContext;
pub use dependency::{build_execution_plan, ExecutionPlan};
pub use error::{ExecutionError, MissingDependency, Result, TaskExecutionError};
pub use orchestrator::Orchestrator;
pub use report::{ExecutionReport, TaskFailure};
pub use status::{RunState, TaskState, TaskStatus};
pub use task::{Task, TaskDescriptor};
