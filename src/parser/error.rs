// ABOUTME: Error types for workflow definition parsing and validation
// ABOUTME: Defines specific error types for parser module operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to read workflow file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Empty workflow: no tasks defined")]
    EmptyWorkflow,

    #[error("Invalid task definition for '{task}': {reason}")]
    InvalidTaskDefinition { task: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ParserError>;
