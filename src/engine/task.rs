// ABOUTME: The Task capability implemented by every unit of work
// ABOUTME: Declares identity, dependency gating and the async execute contract

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;

use super::context::WorkflowContext;
use super::error::TaskExecutionError;

/// A unit of work with an id, a display name and prerequisite task ids.
///
/// `execute` reads whatever it needs from the context's shared data, writes
/// its outputs back, and returns the value the orchestrator records in
/// `task_results` under this task's id. Status is tracked by the
/// orchestrator, never by the task.
#[async_trait]
pub trait Task: Send + Sync {
    fn task_id(&self) -> &str;

    fn name(&self) -> &str;

    fn dependencies(&self) -> &[String];

    async fn execute(&self, context: &mut WorkflowContext) -> Result<Value, TaskExecutionError>;

    /// True when every dependency is in `completed`
    fn can_execute(&self, completed: &HashSet<String>) -> bool {
        self.dependencies().iter().all(|dep| completed.contains(dep))
    }
}

/// Identity fields shared by concrete task types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescriptor {
    pub id: String,
    pub name: String,
    pub dependencies: Vec<String>,
}

impl TaskDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gate {
        descriptor: TaskDescriptor,
    }

    #[async_trait]
    impl Task for Gate {
        fn task_id(&self) -> &str {
            &self.descriptor.id
        }

        fn name(&self) -> &str {
            &self.descriptor.name
        }

        fn dependencies(&self) -> &[String] {
            &self.descriptor.dependencies
        }

        async fn execute(
            &self,
            _context: &mut WorkflowContext,
        ) -> Result<Value, TaskExecutionError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_can_execute_requires_every_dependency() {
        let gate = Gate {
            descriptor: TaskDescriptor::new("c", "C").depends_on(["a", "b"]),
        };

        let mut completed = HashSet::new();
        assert!(!gate.can_execute(&completed));

        completed.insert("a".to_string());
        assert!(!gate.can_execute(&completed));

        completed.insert("b".to_string());
        assert!(gate.can_execute(&completed));
    }

    #[test]
    fn test_no_dependencies_is_always_ready() {
        let gate = Gate {
            descriptor: TaskDescriptor::new("root", "Root"),
        };

        assert!(gate.can_execute(&HashSet::new()));
    }
}
