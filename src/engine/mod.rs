// src/engine/mod.rs

//! Orchestration engine for initdag.
//!
//! This module ties together:
//! - the run API ([`Scheduler::start`], [`Scheduler::await_completion`])
//! - the per-run state shared with worker contexts
//! - the dispatcher, which walks the topological order and runs the
//!   completion protocol for every task
//! - run reports and error sinks handed back to the embedding application
//!
//! Everything mutable during a run lives in [`run_state::RunState`]; the
//! graph, the order and the tasks themselves are read-only once `start()`
//! has begun dispatching.

mod dispatcher;
pub mod report;
mod run_state;
pub mod scheduler;
pub mod sink;

pub use report::{RunReport, TaskTiming};
pub use scheduler::Scheduler;
pub use sink::{ErrorSink, TracingErrorSink};
