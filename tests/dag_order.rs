// tests/dag_order.rs

use std::error::Error;

use initdag::dag::{DependencyGraph, TopologicalOrder};
use initdag::errors::InitDagError;
use initdag::task::TaskRef;
use initdag::types::TaskId;

use initdag_test_utils::builders::TaskBuilder;

type TestResult = Result<(), Box<dyn Error>>;

fn decl(name: &str, deps: &[&str]) -> (TaskId, Vec<TaskId>) {
    (TaskId::new(name), deps.iter().map(|d| TaskId::new(*d)).collect())
}

fn names(order: &TopologicalOrder) -> Vec<&str> {
    order.ids().iter().map(TaskId::as_str).collect()
}

#[test]
fn chain_is_ordered_parent_first() -> TestResult {
    let graph = DependencyGraph::from_declarations([
        decl("c", &["b"]),
        decl("b", &["a"]),
        decl("a", &[]),
    ])?;
    let order = TopologicalOrder::sort(&graph)?;

    assert_eq!(names(&order), vec!["a", "b", "c"]);
    assert_eq!(order.position("a"), Some(0));
    assert_eq!(order.position("missing"), None);
    Ok(())
}

#[test]
fn independent_tasks_keep_declaration_order() -> TestResult {
    let graph = DependencyGraph::from_declarations([
        decl("zeta", &[]),
        decl("alpha", &[]),
        decl("mid", &["zeta", "alpha"]),
        decl("beta", &[]),
    ])?;
    let order = TopologicalOrder::sort(&graph)?;

    assert_eq!(names(&order), vec!["zeta", "alpha", "beta", "mid"]);

    // Same input, same order.
    let again = TopologicalOrder::sort(&graph)?;
    assert_eq!(order, again);
    Ok(())
}

#[test]
fn graph_exposes_both_directions() -> TestResult {
    let graph = DependencyGraph::from_declarations([
        decl("A", &[]),
        decl("B", &["A"]),
        decl("C", &["A"]),
        decl("D", &["B", "C", "B"]),
    ])?;

    assert_eq!(graph.len(), 4);
    assert!(graph.contains("D"));
    assert!(!graph.contains("E"));

    let children: Vec<&str> = graph.children_of("A").into_iter().map(TaskId::as_str).collect();
    assert_eq!(children, vec!["B", "C"]);

    // Repeated dependencies collapse into one edge.
    let deps: Vec<&str> = graph
        .dependencies_of("D")
        .into_iter()
        .map(TaskId::as_str)
        .collect();
    assert_eq!(deps, vec!["B", "C"]);

    let tasks: Vec<&str> = graph.tasks().map(TaskId::as_str).collect();
    assert_eq!(tasks, vec!["A", "B", "C", "D"]);
    Ok(())
}

#[test]
fn graph_from_tasks_uses_task_declarations() -> TestResult {
    let tasks: Vec<TaskRef<String>> = [
        TaskBuilder::new("db"),
        TaskBuilder::new("cache").after("db"),
        TaskBuilder::new("http").after("cache").after("db"),
    ]
    .into_iter()
    .map(|b| b.shared() as TaskRef<String>)
    .collect();
    let graph = DependencyGraph::build(&tasks)?;
    let order = TopologicalOrder::sort(&graph)?;

    assert_eq!(names(&order), vec!["db", "cache", "http"]);
    Ok(())
}

#[test]
fn cycle_is_rejected_with_participants() {
    let err = DependencyGraph::from_declarations([
        decl("ok", &[]),
        decl("x", &["z"]),
        decl("y", &["x"]),
        decl("z", &["y"]),
    ])
    .expect_err("cycle must be rejected");

    match err {
        InitDagError::DagCycle(msg) => {
            assert!(msg.contains("cycle detected"), "{msg}");
            for name in ["x", "y", "z"] {
                assert!(msg.contains(&format!("'{name}'")) || msg.contains(name), "{msg}");
            }
            assert!(!msg.contains("ok"), "{msg}");
        }
        other => panic!("expected DagCycle, got {other:?}"),
    }
}

#[test]
fn self_dependency_is_a_cycle() {
    let err = DependencyGraph::from_declarations([decl("a", &["a"])])
        .expect_err("self dependency must be rejected");
    assert!(matches!(err, InitDagError::DagCycle(_)), "{err:?}");
}

#[test]
fn unknown_dependency_is_a_config_error() {
    let err = DependencyGraph::from_declarations([decl("a", &["ghost"])])
        .expect_err("unknown dependency must be rejected");
    match err {
        InitDagError::ConfigError(msg) => assert!(msg.contains("ghost"), "{msg}"),
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn duplicate_identity_is_a_config_error() {
    let err = DependencyGraph::from_declarations([decl("a", &[]), decl("a", &[])])
        .expect_err("duplicate must be rejected");
    assert!(matches!(err, InitDagError::ConfigError(_)), "{err:?}");
}
