//! Worker side of the hand-off: read the file named on the command line and
//! rebuild the configuration before any test runs

use std::ffi::OsString;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::codec::{decode, decode_fork_context};
use crate::error::{EXIT_OK, EXIT_OTHER, EXIT_TESTS_FAILED, Error, Result};
use crate::handoff::{Handoff, WorkerPhase};
use crate::model::{ForkContext, ProviderConfiguration, StartupConfiguration};
use crate::transport::ForkTransport;

/// Positional worker arguments: the configuration path, then an optional
/// process id to watch. A pid that is not a number is ignored, as is
/// anything after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerArgs {
    pub config_path: PathBuf,
    pub plugin_pid: Option<u32>,
}

impl WorkerArgs {
    /// Parse arguments that follow the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let config_path = args
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| Error::Config("missing configuration file argument".to_string()))?;

        let plugin_pid = args.next().and_then(|raw| {
            let text = raw.to_string_lossy();
            match text.parse::<u32>() {
                Ok(pid) => Some(pid),
                Err(_) => {
                    warn!("Ignoring plugin pid '{}': not a process id", text);
                    None
                }
            }
        });

        Ok(Self {
            config_path,
            plugin_pid,
        })
    }
}

/// Configuration as reconstructed inside the worker, read-only from here on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootedConfiguration {
    pub provider: ProviderConfiguration,
    pub startup: StartupConfiguration,
    pub fork: ForkContext,
}

/// Load and decode the configuration named by `args`.
pub fn boot(args: &WorkerArgs) -> Result<BootedConfiguration> {
    let mut handoff = Handoff::start(WorkerPhase::Started);
    load(args, &mut handoff)
}

fn load(args: &WorkerArgs, handoff: &mut Handoff<WorkerPhase>) -> Result<BootedConfiguration> {
    let store = ForkTransport::load(&args.config_path)?;
    let (provider, startup) = decode(&store)?;
    let mut fork = decode_fork_context(&store)?;
    if args.plugin_pid.is_some() {
        fork.plugin_pid = args.plugin_pid;
    }
    handoff.advance(WorkerPhase::Loaded)?;

    info!(
        "Fork {} booted provider {} from {:?}",
        fork.fork_number,
        startup.provider_class_name(),
        args.config_path
    );
    Ok(BootedConfiguration {
        provider,
        startup,
        fork,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineReport {
    pub tests_run: u32,
    pub failures: u32,
    pub errors: u32,
    pub skipped: u32,
}

impl EngineReport {
    pub fn has_failures(&self) -> bool {
        self.failures > 0 || self.errors > 0
    }
}

/// The test execution engine the decoded configuration is handed to.
pub trait TestEngine {
    fn execute(&mut self, config: &BootedConfiguration) -> anyhow::Result<EngineReport>;
}

/// Boot, hand the configuration to `engine` and turn the result into an
/// exit status.
pub fn run_worker<E: TestEngine>(args: &WorkerArgs, engine: &mut E) -> i32 {
    let mut handoff = Handoff::start(WorkerPhase::Started);
    let config = match load(args, &mut handoff) {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot boot worker from {:?}: {}", args.config_path, e);
            return e.exit_code();
        }
    };

    if let Err(e) = handoff.advance(WorkerPhase::Consumed) {
        return e.exit_code();
    }

    match engine.execute(&config) {
        Ok(report) if report.has_failures() => EXIT_TESTS_FAILED,
        Ok(report) if report.tests_run == 0 && config.startup.fail_if_no_tests() => {
            error!("No tests were executed");
            EXIT_TESTS_FAILED
        }
        Ok(_) => EXIT_OK,
        Err(e) => {
            error!("Test engine failed: {:#}", e);
            EXIT_OTHER
        }
    }
}
