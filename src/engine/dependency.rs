// ABOUTME: Execution planning over registered tasks and their declared dependencies
// ABOUTME: Produces a registration-ordered topological plan and diagnoses cycles

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::error::{ExecutionError, MissingDependency, Result};
use super::task::Task;

/// Ordered task ids, each appearing after all of its dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionPlan {
    task_ids: Vec<String>,
}

/// Build a plan for `tasks`, given in registration order.
///
/// Each step places the first task, in registration order, whose
/// dependencies have all been placed. The result is therefore a pure
/// function of the registration sequence and the dependency graph.
pub fn build_execution_plan(tasks: &[&dyn Task]) -> Result<ExecutionPlan> {
    let mut completed: HashSet<String> = HashSet::with_capacity(tasks.len());
    let mut task_ids = Vec::with_capacity(tasks.len());

    while completed.len() < tasks.len() {
        let next = tasks
            .iter()
            .find(|task| !completed.contains(task.task_id()) && task.can_execute(&completed));

        match next {
            Some(task) => {
                debug!(
                    "Planned task {} at position {}",
                    task.task_id(),
                    task_ids.len()
                );
                task_ids.push(task.task_id().to_string());
                completed.insert(task.task_id().to_string());
            }
            None => return Err(diagnose(tasks, &completed)),
        }
    }

    Ok(ExecutionPlan { task_ids })
}

/// Explain why no remaining task can be placed.
fn diagnose(tasks: &[&dyn Task], placed: &HashSet<String>) -> ExecutionError {
    let registered: HashSet<&str> = tasks.iter().map(|task| task.task_id()).collect();
    let remaining: Vec<&dyn Task> = tasks
        .iter()
        .copied()
        .filter(|task| !placed.contains(task.task_id()))
        .collect();

    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
    for task in &remaining {
        indices.insert(task.task_id(), graph.add_node(task.task_id()));
    }

    let mut missing = Vec::new();
    for task in &remaining {
        let task_node = indices[task.task_id()];

        for dependency in task.dependencies() {
            if let Some(&dep_node) = indices.get(dependency.as_str()) {
                // Edge from dependency to task (dependency -> task)
                graph.add_edge(dep_node, task_node, ());
            } else if !registered.contains(dependency.as_str()) {
                let entry = MissingDependency {
                    task_id: task.task_id().to_string(),
                    dependency: dependency.clone(),
                };
                if !missing.contains(&entry) {
                    missing.push(entry);
                }
            }
        }
    }

    // Node indices follow registration order
    let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|mut component| {
            component.sort();
            component
        })
        .collect();
    components.sort_by_key(|component| component[0]);

    let cycles = components
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|node| graph[node].to_string())
                .collect()
        })
        .collect();

    ExecutionError::CyclicDependency {
        unresolved: remaining
            .iter()
            .map(|task| task.task_id().to_string())
            .collect(),
        cycles,
        missing,
    }
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.task_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.task_ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.task_ids.iter()
    }

    pub fn task_ids(&self) -> &[String] {
        &self.task_ids
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.task_ids.iter().any(|id| id == task_id)
    }

    pub fn position(&self, task_id: &str) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }

    /// Tasks that run before the given task
    pub fn predecessors(&self, task_id: &str) -> &[String] {
        match self.position(task_id) {
            Some(index) => &self.task_ids[..index],
            None => &[],
        }
    }

    pub fn into_task_ids(self) -> Vec<String> {
        self.task_ids
    }
}

impl<'a> IntoIterator for &'a ExecutionPlan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.task_ids.iter()
    }
}

impl std::fmt::Display for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.task_ids.join(" -> "))
    }
}
