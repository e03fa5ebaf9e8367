// ABOUTME: Main library module for the switchyard workflow orchestrator
// ABOUTME: Exports all core modules and provides the public API

pub mod cli;
pub mod engine;
pub mod output;
pub mod parser;
pub mod tasks;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use engine::{
    ExecutionError, ExecutionPlan, ExecutionReport, Orchestrator, Task, TaskExecutionError,
    TaskStatus, WorkflowContext,
};
pub use output::OutputFormat;
pub use parser::{WorkflowDefinition, WorkflowParser};
pub use tasks::TaskRegistry;

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
