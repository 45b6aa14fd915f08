//! Configuration value objects handed from the parent to a worker
//!
//! All types are plain immutable aggregates compared field by field. Nothing
//! is shared by identity across the process boundary: the worker ends up with
//! its own equal copy.

mod classpath;
mod provider;
mod startup;

use serde::{Deserialize, Serialize};

pub use classpath::{ClassLoaderConfiguration, Classpath, ClasspathConfiguration};
pub use provider::{
    CommandLineOption, DirectoryScanParameters, ProviderConfiguration, ReporterConfiguration,
    RunOrder, RunOrderParameters, Shutdown, TestArtifactInfo, TestListResolver, TestPattern,
    TestRequest, TypeEncodedValue,
};
pub use startup::StartupConfiguration;

/// Per-launch facts that travel next to the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkContext {
    /// Position of this worker among the workers of one run, starting at 1.
    #[serde(default)]
    pub fork_number: u32,
    /// Process to watch; the worker ends itself when it disappears.
    #[serde(default)]
    pub plugin_pid: Option<u32>,
}

impl ForkContext {
    pub fn new(fork_number: u32, plugin_pid: Option<u32>) -> Self {
        Self {
            fork_number,
            plugin_pid,
        }
    }
}
