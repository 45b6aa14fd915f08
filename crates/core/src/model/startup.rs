use serde::{Deserialize, Serialize};

use super::{ClassLoaderConfiguration, ClasspathConfiguration};
use crate::error::{Error, Result};

/// What the worker needs before it can load the provider: which provider to
/// instantiate and how to build its class loading environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupConfiguration {
    provider_class_name: String,
    classpath_configuration: ClasspathConfiguration,
    class_loader_configuration: ClassLoaderConfiguration,
    #[serde(default)]
    fail_if_no_tests: bool,
    #[serde(default)]
    is_forking: bool,
}

impl StartupConfiguration {
    /// Fails with an encoding error when `provider_class_name` is blank.
    pub fn new(
        provider_class_name: impl Into<String>,
        classpath_configuration: ClasspathConfiguration,
        class_loader_configuration: ClassLoaderConfiguration,
        fail_if_no_tests: bool,
        is_forking: bool,
    ) -> Result<Self> {
        let config = Self {
            provider_class_name: provider_class_name.into(),
            classpath_configuration,
            class_loader_configuration,
            fail_if_no_tests,
            is_forking,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants `new` enforces. Values that arrive through serde
    /// bypass `new`, so the encoder calls this again.
    pub fn validate(&self) -> Result<()> {
        if self.provider_class_name.trim().is_empty() {
            return Err(Error::encoding(
                "providerClassName",
                "provider class name must not be empty",
            ));
        }
        Ok(())
    }

    pub fn provider_class_name(&self) -> &str {
        &self.provider_class_name
    }

    pub fn classpath_configuration(&self) -> &ClasspathConfiguration {
        &self.classpath_configuration
    }

    pub fn class_loader_configuration(&self) -> &ClassLoaderConfiguration {
        &self.class_loader_configuration
    }

    pub fn fail_if_no_tests(&self) -> bool {
        self.fail_if_no_tests
    }

    pub fn is_forking(&self) -> bool {
        self.is_forking
    }

    pub fn is_manifest_only_jar_requested_and_usable(&self) -> bool {
        self.class_loader_configuration
            .is_manifest_only_jar_requested_and_usable()
    }
}
