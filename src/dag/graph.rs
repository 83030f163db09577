// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::errors::{InitDagError, Result};
use crate::task::TaskRef;
use crate::types::TaskId;

/// Dependency graph keyed by task identity.
///
/// Nodes keep their declaration order; every adjacency list is in
/// declaration order as well, so anything derived from the graph is
/// reproducible for a given task list.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    ids: Vec<TaskId>,
    index: HashMap<TaskId, usize>,
    /// Direct dependencies: tasks that must complete before this one.
    parents: Vec<Vec<usize>>,
    /// Direct dependents: tasks that list this one as a dependency.
    children: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Build the graph for a list of tasks.
    pub fn build<O: Clone + Send + Sync + 'static>(tasks: &[TaskRef<O>]) -> Result<Self> {
        Self::from_declarations(
            tasks
                .iter()
                .map(|t| (t.id().clone(), t.dependencies().to_vec())),
        )
    }

    /// Build the graph from `(identity, dependencies)` pairs in declaration
    /// order.
    ///
    /// Fails with [`InitDagError::ConfigError`] for duplicate identities and
    /// unknown dependencies, and with [`InitDagError::DagCycle`] if the
    /// dependency relation is cyclic.
    pub fn from_declarations<I>(declarations: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TaskId, Vec<TaskId>)>,
    {
        let declarations: Vec<(TaskId, Vec<TaskId>)> = declarations.into_iter().collect();

        // First pass: assign indices.
        let mut ids = Vec::with_capacity(declarations.len());
        let mut index = HashMap::with_capacity(declarations.len());
        for (id, _) in &declarations {
            if index.insert(id.clone(), ids.len()).is_some() {
                return Err(InitDagError::ConfigError(format!(
                    "task '{id}' is registered more than once"
                )));
            }
            ids.push(id.clone());
        }

        // Second pass: resolve edges.
        let mut parents = vec![Vec::new(); ids.len()];
        let mut children = vec![Vec::new(); ids.len()];
        for (child, (id, deps)) in declarations.iter().enumerate() {
            for dep in deps {
                if dep == id {
                    return Err(InitDagError::DagCycle(format!(
                        "task '{id}' cannot depend on itself"
                    )));
                }
                let Some(&parent) = index.get(dep) else {
                    return Err(InitDagError::ConfigError(format!(
                        "task '{id}' has unknown dependency '{dep}'"
                    )));
                };
                if parents[child].contains(&parent) {
                    continue;
                }
                parents[child].push(parent);
                children[parent].push(child);
            }
        }

        let graph = Self {
            ids,
            index,
            parents,
            children,
        };
        graph.ensure_acyclic()?;
        Ok(graph)
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// All task identities in declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = &TaskId> {
        self.ids.iter()
    }

    pub fn contains(&self, task: &str) -> bool {
        self.index.contains_key(task)
    }

    /// Immediate dependencies of a task.
    pub fn dependencies_of(&self, task: &str) -> Vec<&TaskId> {
        self.index
            .get(task)
            .map(|&i| self.parents[i].iter().map(|&p| &self.ids[p]).collect())
            .unwrap_or_default()
    }

    /// Immediate dependents of a task.
    pub fn children_of(&self, task: &str) -> Vec<&TaskId> {
        self.index
            .get(task)
            .map(|&i| self.children[i].iter().map(|&c| &self.ids[c]).collect())
            .unwrap_or_default()
    }

    pub(crate) fn id_at(&self, index: usize) -> &TaskId {
        &self.ids[index]
    }

    pub(crate) fn children_at(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    /// Number of direct dependencies of the task at `index`.
    pub(crate) fn in_degree_at(&self, index: usize) -> usize {
        self.parents[index].len()
    }

    fn ensure_acyclic(&self) -> Result<()> {
        match super::topo::kahn(self) {
            Ok(_) => Ok(()),
            Err(residual) => Err(InitDagError::DagCycle(format!(
                "cycle detected in task DAG involving tasks: {}",
                self.describe_cycles(&residual)
            ))),
        }
    }

    /// Names of the tasks that sit on a cycle.
    ///
    /// `residual` is everything Kahn's algorithm could not order; that
    /// includes tasks merely downstream of a cycle, so strongly connected
    /// components are used to narrow it down.
    fn describe_cycles(&self, residual: &[usize]) -> String {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<_> = (0..self.ids.len()).map(|i| graph.add_node(i)).collect();
        for (child, parents) in self.parents.iter().enumerate() {
            for &parent in parents {
                graph.add_edge(nodes[parent], nodes[child], ());
            }
        }

        let mut on_cycle: Vec<usize> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .flatten()
            .map(|n| graph[n])
            .collect();

        if on_cycle.is_empty() {
            on_cycle = residual.to_vec();
        }
        on_cycle.sort_unstable();

        on_cycle
            .iter()
            .map(|&i| self.ids[i].as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
