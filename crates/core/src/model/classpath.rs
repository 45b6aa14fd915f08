use serde::{Deserialize, Serialize};

/// Ordered list of classpath entries. Order decides loading precedence and
/// duplicates are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Classpath(Vec<String>);

impl Classpath {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(entries.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A new classpath with `entry` appended.
    pub fn with_entry(&self, entry: impl Into<String>) -> Self {
        let mut entries = self.0.clone();
        entries.push(entry.into());
        Self(entries)
    }

    /// Entries joined with the platform path separator, as a launcher would
    /// pass them on a command line.
    pub fn to_path_string(&self) -> String {
        let separator = if cfg!(windows) { ";" } else { ":" };
        self.0.join(separator)
    }
}

impl<S: Into<String>> FromIterator<S> for Classpath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClasspathConfiguration {
    test_classpath: Classpath,
    provider_classpath: Classpath,
    #[serde(default)]
    additional_classpath: Classpath,
    enable_assertions: bool,
    child_delegation: bool,
}

impl ClasspathConfiguration {
    pub fn new(
        test_classpath: Classpath,
        provider_classpath: Classpath,
        additional_classpath: Classpath,
        enable_assertions: bool,
        child_delegation: bool,
    ) -> Self {
        Self {
            test_classpath,
            provider_classpath,
            additional_classpath,
            enable_assertions,
            child_delegation,
        }
    }

    pub fn test_classpath(&self) -> &Classpath {
        &self.test_classpath
    }

    pub fn provider_classpath(&self) -> &Classpath {
        &self.provider_classpath
    }

    pub fn additional_classpath(&self) -> &Classpath {
        &self.additional_classpath
    }

    pub fn enable_assertions(&self) -> bool {
        self.enable_assertions
    }

    pub fn child_delegation(&self) -> bool {
        self.child_delegation
    }

    /// Test classpath followed by the additional entries.
    pub fn effective_test_classpath(&self) -> Classpath {
        self.test_classpath
            .entries()
            .iter()
            .chain(self.additional_classpath.entries())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLoaderConfiguration {
    use_system_class_loader: bool,
    use_manifest_only_jar: bool,
}

impl ClassLoaderConfiguration {
    pub fn new(use_system_class_loader: bool, use_manifest_only_jar: bool) -> Self {
        Self {
            use_system_class_loader,
            use_manifest_only_jar,
        }
    }

    pub fn use_system_class_loader(&self) -> bool {
        self.use_system_class_loader
    }

    pub fn use_manifest_only_jar(&self) -> bool {
        self.use_manifest_only_jar
    }

    /// A manifest-only jar launch is only usable on top of the system loader.
    pub fn is_manifest_only_jar_requested_and_usable(&self) -> bool {
        self.use_system_class_loader && self.use_manifest_only_jar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_only_jar_requires_system_loader() {
        assert!(ClassLoaderConfiguration::new(true, true).is_manifest_only_jar_requested_and_usable());
        assert!(!ClassLoaderConfiguration::new(true, false).is_manifest_only_jar_requested_and_usable());
        assert!(!ClassLoaderConfiguration::new(false, true).is_manifest_only_jar_requested_and_usable());
    }

    #[test]
    fn test_effective_classpath_order() {
        let config = ClasspathConfiguration::new(
            Classpath::new(["CP1", "CP2"]),
            Classpath::new(["SP1"]),
            Classpath::new(["EXTRA"]),
            false,
            false,
        );
        assert_eq!(
            config.effective_test_classpath().entries(),
            ["CP1", "CP2", "EXTRA"]
        );
    }

    #[test]
    fn test_with_entry_leaves_original_untouched() {
        let base = Classpath::new(["a"]);
        let extended = base.with_entry("b");
        assert_eq!(base.len(), 1);
        assert_eq!(extended.entries(), ["a", "b"]);
    }

    #[test]
    fn test_classpath_serializes_as_list() {
        let json = serde_json::to_string(&Classpath::new(["x", "y"])).unwrap();
        assert_eq!(json, r#"["x","y"]"#);
    }
}
