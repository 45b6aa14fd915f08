use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Everything a spawner needs to start one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerInvocation {
    /// Path of the persisted configuration; always the first positional argument.
    pub config_path: PathBuf,
    /// Optional liveness target, passed as the second positional argument.
    pub plugin_pid: Option<u32>,
    pub fork_number: u32,
}

impl WorkerInvocation {
    /// Positional arguments the worker expects after any fixed arguments.
    pub fn positional_args(&self) -> Vec<String> {
        let mut args = vec![self.config_path.to_string_lossy().into_owned()];
        if let Some(pid) = self.plugin_pid {
            args.push(pid.to_string());
        }
        args
    }
}

/// Exit of a worker process as observed by the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerExit {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl WorkerExit {
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for WorkerExit {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Starts a worker and blocks until it has exited.
///
/// Returning means the process is gone, which is what allows the caller to
/// delete the transport file afterwards.
pub trait WorkerSpawner: Send + Sync {
    fn spawn_and_wait(&self, invocation: &WorkerInvocation) -> Result<WorkerExit>;
}

/// Command line used to start workers: a program with fixed leading
/// arguments, followed by the invocation's positional arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Full argument list for `invocation`, without the program.
    pub fn args_for(&self, invocation: &WorkerInvocation) -> Vec<String> {
        let mut args = self.args.clone();
        args.extend(invocation.positional_args());
        args
    }

    pub fn to_shell_command(&self, invocation: &WorkerInvocation) -> String {
        let mut cmd = quote(&self.program);
        for arg in self.args_for(invocation) {
            cmd.push(' ');
            cmd.push_str(&quote(&arg));
        }
        cmd
    }

    fn build(&self, invocation: &WorkerInvocation) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args_for(invocation));

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            debug!("Setting env: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd
    }
}

impl WorkerSpawner for WorkerCommand {
    fn spawn_and_wait(&self, invocation: &WorkerInvocation) -> Result<WorkerExit> {
        info!(
            "Starting fork {}: {}",
            invocation.fork_number,
            self.to_shell_command(invocation)
        );
        let status = self.build(invocation).status().map_err(|e| {
            Error::Handoff(format!("failed to start worker '{}': {e}", self.program))
        })?;
        Ok(WorkerExit::from(status))
    }
}

fn quote(arg: &str) -> String {
    if arg.contains(' ') {
        format!("'{arg}'")
    } else {
        arg.to_string()
    }
}
