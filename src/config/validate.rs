// src/config/validate.rs

//! Semantic checks applied to a parsed task file.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile, SchedulerOptions, TaskConfig};
use crate::errors::{InitDagError, Result};
use crate::logging::parse_level_str;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = InitDagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        if raw.task.is_empty() {
            return Err(config_error(
                "task file must declare at least one [task.<name>] section",
            ));
        }
        check_options(&raw.config)?;
        for (name, task) in &raw.task {
            check_task(&raw, name, task)?;
        }
        check_acyclic(&raw)?;

        Ok(ConfigFile::new_unchecked(raw.config, raw.task))
    }
}

fn config_error(msg: impl Into<String>) -> InitDagError {
    InitDagError::ConfigError(msg.into())
}

fn check_options(options: &SchedulerOptions) -> Result<()> {
    if options.max_workers == 0 {
        return Err(config_error("[config].max_workers must be at least 1"));
    }
    match options.log_level.as_deref() {
        Some(level) if parse_level_str(level).is_none() => Err(config_error(format!(
            "[config].log_level '{level}' is not one of error, warn, info, debug, trace"
        ))),
        _ => Ok(()),
    }
}

fn check_task(raw: &RawConfigFile, name: &str, task: &TaskConfig) -> Result<()> {
    if task.cmd.trim().is_empty() {
        return Err(config_error(format!("task '{name}' has an empty `cmd`")));
    }
    if let Some(dep) = task.after.iter().find(|dep| !raw.task.contains_key(*dep)) {
        return Err(config_error(format!(
            "task '{name}' has unknown dependency '{dep}' in `after`"
        )));
    }
    if task.after.iter().any(|dep| dep == name) {
        return Err(InitDagError::DagCycle(format!(
            "task '{name}' cannot depend on itself"
        )));
    }
    Ok(())
}

/// Edges point from dependency to dependent.
fn check_acyclic(raw: &RawConfigFile) -> Result<()> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for (name, task) in &raw.task {
        graph.add_node(name.as_str());
        for dep in &task.after {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    toposort(&graph, None).map(|_| ()).map_err(|cycle| {
        InitDagError::DagCycle(format!(
            "cycle detected in task DAG involving task '{}'",
            cycle.node_id()
        ))
    })
}
