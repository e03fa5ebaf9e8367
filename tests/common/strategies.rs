// ABOUTME: Proptest strategies for generating task dependency graphs
// ABOUTME: Produces random DAGs in shuffled registration order, plus broken variants

use proptest::prelude::*;
use proptest::sample::Index;

use super::RecordingTask;
use switchyard::engine::Orchestrator;

/// Task ids with their dependencies, listed in registration order
#[derive(Debug, Clone)]
pub struct GeneratedGraph {
    pub tasks: Vec<(String, Vec<String>)>,
    /// Topological rank of each task, indexed like `tasks`
    pub ranks: Vec<usize>,
}

impl GeneratedGraph {
    pub fn to_orchestrator(&self) -> Orchestrator {
        let mut orchestrator = Orchestrator::new("generated");
        for (id, dependencies) in &self.tasks {
            let deps: Vec<&str> = dependencies.iter().map(String::as_str).collect();
            orchestrator.add_task(RecordingTask::new(id).after(&deps));
        }
        orchestrator
    }

    /// Make the lowest and highest ranked tasks depend on each other
    pub fn with_back_edge(mut self) -> Self {
        let low = position_of_rank(&self.ranks, 0);
        let high = position_of_rank(&self.ranks, self.ranks.len() - 1);

        let low_id = self.tasks[low].0.clone();
        let high_id = self.tasks[high].0.clone();
        self.tasks[low].1.push(high_id);
        self.tasks[high].1.push(low_id);
        self
    }

    pub fn with_unregistered_dependency(mut self, at: Index) -> Self {
        let target = at.index(self.tasks.len());
        self.tasks[target].1.push("ghost".to_string());
        self
    }
}

fn position_of_rank(ranks: &[usize], rank: usize) -> usize {
    ranks
        .iter()
        .position(|r| *r == rank)
        .expect("ranks are a permutation")
}

/// Random DAGs: a task may only depend on tasks of lower rank, and tasks are
/// registered in an order unrelated to rank
pub fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = GeneratedGraph> {
    (1..=max_tasks)
        .prop_flat_map(|n| {
            (
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                prop::collection::vec(any::<bool>(), n * n),
            )
        })
        .prop_map(|(ranks, registration, edges)| {
            let n = ranks.len();
            let id = |node: usize| format!("task_{}", node);

            let tasks = registration
                .iter()
                .map(|&node| {
                    let dependencies = (0..n)
                        .filter(|&other| ranks[other] < ranks[node] && edges[node * n + other])
                        .map(id)
                        .collect();
                    (id(node), dependencies)
                })
                .collect();

            GeneratedGraph {
                tasks,
                ranks: registration.iter().map(|&node| ranks[node]).collect(),
            }
        })
}

/// DAGs of at least two tasks, for adding a cycle
pub fn cyclic_graph_strategy(max_tasks: usize) -> impl Strategy<Value = GeneratedGraph> {
    dag_strategy(max_tasks)
        .prop_filter("needs two tasks", |graph| graph.tasks.len() >= 2)
        .prop_map(GeneratedGraph::with_back_edge)
}

pub fn missing_dependency_strategy(max_tasks: usize) -> impl Strategy<Value = GeneratedGraph> {
    (dag_strategy(max_tasks), any::<Index>())
        .prop_map(|(graph, at)| graph.with_unregistered_dependency(at))
}
