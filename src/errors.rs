// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::TaskId;

/// Errors surfaced synchronously by configuration and the run API.
#[derive(Error, Debug)]
pub enum InitDagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Configuration error: no tasks registered")]
    EmptyTaskList,

    #[error("Usage error: run API called outside the caller context")]
    WrongContext,

    #[error("Usage error: scheduler already started")]
    AlreadyStarted,

    #[error("Usage error: await_completion called before start")]
    NotStarted,

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of a single task.
///
/// Stored in the result cache next to successful outputs, so it must be
/// cheap to clone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task '{task}' failed: {message}")]
    Failed { task: TaskId, message: String },

    #[error("task '{task}' panicked: {message}")]
    Panicked { task: TaskId, message: String },

    #[error("task '{task}' skipped: dependency '{dependency}' failed")]
    DependencyFailed { task: TaskId, dependency: TaskId },
}

impl TaskError {
    pub fn failed(task: &TaskId, message: impl Into<String>) -> Self {
        TaskError::Failed {
            task: task.clone(),
            message: message.into(),
        }
    }

    /// Identity of the task this error belongs to.
    pub fn task(&self) -> &TaskId {
        match self {
            TaskError::Failed { task, .. }
            | TaskError::Panicked { task, .. }
            | TaskError::DependencyFailed { task, .. } => task,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, InitDagError>;
