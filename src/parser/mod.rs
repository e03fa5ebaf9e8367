// ABOUTME: Parser module for YAML workflow definitions
// ABOUTME: Exports definition structures and the file parser

pub mod error;
pub mod task;
pub mod workflow;

pub use error::{ParserError, ValidationError};
pub use task::TaskDefinition;
pub use workflow::{WorkflowDefinition, WorkflowParser};
