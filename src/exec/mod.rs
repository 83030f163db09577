// src/exec/mod.rs

//! Execution contexts.
//!
//! - [`context`] defines the [`WorkerContext`] trait plus the trivial
//!   [`InlineContext`] and [`ThreadContext`] implementations.
//! - [`pool`] provides [`TokioWorkerPool`], the default shared worker pool.
//! - [`command`] builds shell-command tasks for the `initdag` binary.

pub mod command;
pub mod context;
pub mod pool;

pub use context::{InlineContext, Job, ThreadContext, WorkerContext};
pub use pool::TokioWorkerPool;
