// src/dag/mod.rs

//! DAG representation and ordering.
//!
//! - [`graph`] holds the dependency graph built from the registered tasks,
//!   and rejects duplicates, unknown dependencies and cycles.
//! - [`topo`] produces the dispatch order (Kahn's algorithm).

pub mod graph;
pub mod topo;

pub use graph::DependencyGraph;
pub use topo::TopologicalOrder;
