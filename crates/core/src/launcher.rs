//! Parent side of the hand-off: encode, persist, spawn, wait, clean up

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use tracing::{info, warn};

use crate::codec::encode_with_context;
use crate::command::{WorkerExit, WorkerInvocation, WorkerSpawner};
use crate::error::Result;
use crate::handoff::{Handoff, HandoffPhase};
use crate::model::{ForkContext, ProviderConfiguration, StartupConfiguration};
use crate::transport::ForkTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub fork_number: u32,
    pub exit: WorkerExit,
    pub config_path: PathBuf,
    /// False when the transport file was kept on purpose or could not be
    /// removed.
    pub cleaned: bool,
}

/// Launches workers, one transport file each.
///
/// Safe to share between threads: every launch draws its own fork number and
/// transport file.
pub struct ForkLauncher<S> {
    transport: ForkTransport,
    spawner: S,
    keep_files: bool,
    forks: AtomicU32,
}

impl<S: WorkerSpawner> ForkLauncher<S> {
    pub fn new(transport: ForkTransport, spawner: S) -> Self {
        Self {
            transport,
            spawner,
            keep_files: false,
            forks: AtomicU32::new(0),
        }
    }

    /// Leave transport files on disk after the worker exits, for debugging.
    pub fn keep_files(mut self, keep: bool) -> Self {
        self.keep_files = keep;
        self
    }

    pub fn transport(&self) -> &ForkTransport {
        &self.transport
    }

    /// Run one worker to completion.
    ///
    /// Encoding errors abort before anything is written or spawned. Once the
    /// file exists it is removed only after the spawner reports that the
    /// worker has exited, whether it succeeded, failed or never started. A
    /// file that cannot be removed does not hide the worker's exit.
    pub fn launch(
        &self,
        provider: &ProviderConfiguration,
        startup: &StartupConfiguration,
        plugin_pid: Option<u32>,
    ) -> Result<WorkerOutcome> {
        let fork_number = self.forks.fetch_add(1, Ordering::SeqCst) + 1;
        let context = ForkContext::new(fork_number, plugin_pid);
        let mut handoff = Handoff::start(HandoffPhase::Created);

        let store = encode_with_context(provider, startup, &context)?;
        let handle = self.transport.persist(&store)?;
        handoff.advance(HandoffPhase::Persisted)?;

        let invocation = WorkerInvocation {
            config_path: handle.path().to_path_buf(),
            plugin_pid,
            fork_number,
        };
        handoff.advance(HandoffPhase::Spawned)?;
        let spawned = self.spawner.spawn_and_wait(&invocation);
        handoff.advance(HandoffPhase::Exited)?;

        // A failed removal is logged; the worker's exit still wins.
        let cleaned = if self.keep_files {
            info!("Keeping transport file {}", handle);
            false
        } else {
            match self.transport.cleanup(&handle) {
                Ok(()) => {
                    handoff.advance(HandoffPhase::Cleaned)?;
                    true
                }
                Err(e) => {
                    warn!("Could not remove transport file {}: {}", handle, e);
                    false
                }
            }
        };

        let exit = spawned?;
        if exit.success() {
            info!("Fork {} finished", fork_number);
        } else {
            warn!("Fork {} exited with {:?}", fork_number, exit.code);
        }

        Ok(WorkerOutcome {
            fork_number,
            exit,
            config_path: handle.into_path(),
            cleaned,
        })
    }
}
