// tests/property_topo_order.rs

use std::collections::BTreeSet;

use proptest::prelude::*;

use initdag::dag::{DependencyGraph, TopologicalOrder};
use initdag::errors::InitDagError;
use initdag::types::TaskId;

type Declarations = Vec<(TaskId, Vec<TaskId>)>;

// Acyclic by construction: task N may only depend on tasks 0..N-1.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Declarations> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        )
        .prop_map(|raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    let deps: BTreeSet<usize> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        potential.into_iter().map(|d| d % i).collect()
                    };
                    (
                        task_name(i),
                        deps.into_iter().map(task_name).collect(),
                    )
                })
                .collect()
        })
    })
}

fn task_name(i: usize) -> TaskId {
    TaskId::new(format!("task_{i}"))
}

proptest! {
    #[test]
    fn every_task_follows_its_dependencies(decls in dag_strategy(12)) {
        let graph = DependencyGraph::from_declarations(decls.clone()).unwrap();
        let order = TopologicalOrder::sort(&graph).unwrap();

        prop_assert_eq!(order.len(), decls.len());
        for (task, deps) in &decls {
            let pos = order.position(task.as_str()).unwrap();
            for dep in deps {
                prop_assert!(order.position(dep.as_str()).unwrap() < pos);
            }
        }
    }

    #[test]
    fn reversed_declaration_still_sorts(decls in dag_strategy(12)) {
        let reversed: Declarations = decls.iter().rev().cloned().collect();
        let graph = DependencyGraph::from_declarations(reversed).unwrap();
        let order = TopologicalOrder::sort(&graph).unwrap();

        for (task, deps) in &decls {
            let pos = order.position(task.as_str()).unwrap();
            for dep in deps {
                prop_assert!(order.position(dep.as_str()).unwrap() < pos);
            }
        }
    }

    #[test]
    fn back_edge_is_reported_as_cycle(decls in dag_strategy(12)) {
        // Find any edge child -> parent and close the loop.
        let edge = decls
            .iter()
            .find_map(|(task, deps)| deps.first().map(|d| (d.clone(), task.clone())));
        prop_assume!(edge.is_some());
        let (parent, child) = edge.unwrap();

        let cyclic: Declarations = decls
            .into_iter()
            .map(|(task, mut deps)| {
                if task == parent {
                    deps.push(child.clone());
                }
                (task, deps)
            })
            .collect();

        let result = DependencyGraph::from_declarations(cyclic);
        prop_assert!(matches!(result, Err(InitDagError::DagCycle(_))));
    }
}
