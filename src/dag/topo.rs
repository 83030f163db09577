// src/dag/topo.rs

use std::collections::VecDeque;

use crate::dag::graph::DependencyGraph;
use crate::errors::{InitDagError, Result};
use crate::types::TaskId;

/// A dispatch order in which every task follows all of its dependencies.
///
/// Independent tasks keep their declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    indices: Vec<usize>,
    ids: Vec<TaskId>,
}

impl TopologicalOrder {
    /// Sort `graph` with Kahn's algorithm.
    pub fn sort(graph: &DependencyGraph) -> Result<Self> {
        let indices = kahn(graph).map_err(|residual| {
            let names: Vec<_> = residual.iter().map(|&i| graph.id_at(i).as_str()).collect();
            InitDagError::DagCycle(format!(
                "cycle detected in task DAG involving tasks: {}",
                names.join(", ")
            ))
        })?;
        let ids = indices.iter().map(|&i| graph.id_at(i).clone()).collect();
        Ok(Self { indices, ids })
    }

    pub fn ids(&self) -> &[TaskId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of `task` in the order.
    pub fn position(&self, task: &str) -> Option<usize> {
        self.ids.iter().position(|id| id.as_str() == task)
    }

    pub(crate) fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// Kahn's algorithm over graph indices.
///
/// Returns the order, or the indices left with a nonzero in-degree when the
/// graph is cyclic.
pub(crate) fn kahn(graph: &DependencyGraph) -> std::result::Result<Vec<usize>, Vec<usize>> {
    let n = graph.len();
    let mut in_degree: Vec<usize> = (0..n).map(|i| graph.in_degree_at(i)).collect();
    let mut ready: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(node) = ready.pop_front() {
        order.push(node);
        for &child in graph.children_at(node) {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                ready.push_back(child);
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        Err((0..n).filter(|&i| in_degree[i] > 0).collect())
    }
}
