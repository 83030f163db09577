// src/exec/command.rs

//! Shell-command tasks used by the `initdag` binary.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::model::TaskConfig;
use crate::errors::TaskError;
use crate::task::FnTask;
use crate::types::TaskId;

/// Output of a command task: the process exit code.
pub type ExitCode = i32;

/// Build a task that runs `cfg.cmd` through the platform shell.
///
/// A non-zero exit status fails the task.
pub fn command_task(name: &str, cfg: &TaskConfig) -> FnTask<ExitCode> {
    let id = TaskId::new(name);
    let cmd = cfg.cmd.clone();
    let task_id = id.clone();

    let mut task = FnTask::new(id, move |_parents| run_command(&task_id, &cmd))
        .on_caller(cfg.on_caller)
        .caller_waits(cfg.caller_waits);

    for dep in &cfg.after {
        task = task.after(dep.as_str());
    }
    task
}

/// Run `cmd` to completion and return its exit code.
pub fn run_command(task: &TaskId, cmd: &str) -> Result<ExitCode, TaskError> {
    info!(task = %task, cmd = %cmd, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    let output = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| TaskError::failed(task, format!("spawning '{cmd}': {e}")))?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        info!(task = %task, "stdout: {}", line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!(task = %task, "stderr: {}", line);
    }

    let code = output.status.code().unwrap_or(-1);
    info!(
        task = %task,
        exit_code = code,
        success = output.status.success(),
        "task process exited"
    );

    if output.status.success() {
        Ok(code)
    } else {
        Err(TaskError::failed(task, format!("exited with status {code}")))
    }
}
