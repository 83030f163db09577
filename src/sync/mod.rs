// src/sync/mod.rs

//! Blocking synchronization primitives shared by the dispatcher and tasks.
//!
//! - [`gate`] holds the countdown [`CompletionGate`] the caller waits on.
//! - [`tracker`] holds [`DependencyTracker`], which a task embeds to wait
//!   until every declared parent has reported completion.

pub mod gate;
pub mod tracker;

pub use gate::CompletionGate;
pub use tracker::{DependencyTracker, ParentResults};
