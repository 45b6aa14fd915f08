use anyhow::{Context, Result};
use forkboot_core::{ForkContext, ProviderConfiguration, StartupConfiguration};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// JSON input of `encode` and `launch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchDescriptor {
    pub provider: ProviderConfiguration,
    pub startup: StartupConfiguration,
    /// Honoured by `encode` only; `launch` assigns its own fork context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork: Option<ForkContext>,
}

impl LaunchDescriptor {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read descriptor {}", path.display()))?;
        let descriptor: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse descriptor {}", path.display()))?;
        descriptor.startup.validate()?;
        Ok(descriptor)
    }
}
