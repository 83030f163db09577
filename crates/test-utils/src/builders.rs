#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use initdag::errors::TaskError;
use initdag::exec::WorkerContext;
use initdag::task::FnTask;
use initdag::types::TaskId;

use crate::recording::ExecutionLog;

/// Builder for closure tasks whose output is their own name.
pub struct TaskBuilder {
    name: String,
    after: Vec<String>,
    on_caller: bool,
    caller_waits: bool,
    sleep: Option<Duration>,
    fail: Option<String>,
    panic: bool,
    log: Option<ExecutionLog>,
    context: Option<Arc<dyn WorkerContext>>,
}

impl TaskBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            after: Vec::new(),
            on_caller: false,
            caller_waits: false,
            sleep: None,
            fail: None,
            panic: false,
            log: None,
            context: None,
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.after.push(dep.to_string());
        self
    }

    pub fn on_caller(mut self, val: bool) -> Self {
        self.on_caller = val;
        self
    }

    pub fn caller_waits(mut self, val: bool) -> Self {
        self.caller_waits = val;
        self
    }

    pub fn sleep_ms(mut self, ms: u64) -> Self {
        self.sleep = Some(Duration::from_millis(ms));
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail = Some(message.to_string());
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic = true;
        self
    }

    pub fn logged(mut self, log: &ExecutionLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    pub fn context(mut self, context: Arc<dyn WorkerContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn build(self) -> FnTask<String> {
        let id = TaskId::new(&self.name);
        let name = self.name.clone();
        let sleep = self.sleep;
        let fail = self.fail.clone();
        let panic = self.panic;
        let log = self.log.clone();

        let mut task = FnTask::new(id.clone(), move |_parents| {
            if let Some(log) = &log {
                log.record(&name);
            }
            if let Some(d) = sleep {
                std::thread::sleep(d);
            }
            if panic {
                panic!("task {name} panicked on purpose");
            }
            match &fail {
                Some(msg) => Err(TaskError::failed(&id, msg.clone())),
                None => Ok(name.clone()),
            }
        })
        .on_caller(self.on_caller)
        .caller_waits(self.caller_waits);

        for dep in &self.after {
            task = task.after(dep.as_str());
        }
        if let Some(ctx) = self.context {
            task = task.with_context(ctx);
        }
        task
    }

    pub fn shared(self) -> Arc<FnTask<String>> {
        Arc::new(self.build())
    }
}
