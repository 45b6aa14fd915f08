use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::impl_stable_name;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunOrder {
    #[default]
    Default,
    Alphabetical,
    ReverseAlphabetical,
    Random,
    Hourly,
    FailedFirst,
    Balanced,
    Filesystem,
}

impl_stable_name!(
    RunOrder, "run order",
    Default => "default",
    Alphabetical => "alphabetical",
    ReverseAlphabetical => "reversealphabetical",
    Random => "random",
    Hourly => "hourly",
    FailedFirst => "failedfirst",
    Balanced => "balanced",
    Filesystem => "filesystem",
);

/// How a worker is told to stop when the parent asks for an abnormal end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Shutdown {
    #[default]
    Default,
    Exit,
    Kill,
}

impl_stable_name!(
    Shutdown, "shutdown policy",
    Default => "default",
    Exit => "exit",
    Kill => "kill",
);

/// Options of the parent build invocation that influence the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLineOption {
    ReactorFailFast,
    ReactorFailAtEnd,
    ReactorFailNever,
    ShowErrors,
    LoggingLevelDebug,
    LoggingLevelInfo,
    LoggingLevelWarn,
    LoggingLevelError,
}

impl_stable_name!(
    CommandLineOption, "command line option",
    ReactorFailFast => "reactor_fail_fast",
    ReactorFailAtEnd => "reactor_fail_at_end",
    ReactorFailNever => "reactor_fail_never",
    ShowErrors => "show_errors",
    LoggingLevelDebug => "logging_level_debug",
    LoggingLevelInfo => "logging_level_info",
    LoggingLevelWarn => "logging_level_warn",
    LoggingLevelError => "logging_level_error",
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryScanParameters {
    base_directory: PathBuf,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default)]
    excludes: Vec<String>,
    #[serde(default)]
    specific_tests: Vec<String>,
    #[serde(default)]
    fail_if_no_tests: bool,
    #[serde(default)]
    run_order: String,
}

impl DirectoryScanParameters {
    pub fn new(
        base_directory: impl Into<PathBuf>,
        includes: Vec<String>,
        excludes: Vec<String>,
        specific_tests: Vec<String>,
        fail_if_no_tests: bool,
        run_order: impl Into<String>,
    ) -> Self {
        Self {
            base_directory: base_directory.into(),
            includes,
            excludes,
            specific_tests,
            fail_if_no_tests,
            run_order: run_order.into(),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    pub fn specific_tests(&self) -> &[String] {
        &self.specific_tests
    }

    pub fn fail_if_no_tests(&self) -> bool {
        self.fail_if_no_tests
    }

    /// Run order as configured by the user: a strategy token such as
    /// `hourly`, or a random seed.
    pub fn run_order(&self) -> &str {
        &self.run_order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOrderParameters {
    run_order: RunOrder,
    #[serde(default)]
    run_order_random_seed: Option<String>,
}

impl RunOrderParameters {
    pub fn new(run_order: RunOrder, run_order_random_seed: Option<String>) -> Self {
        Self {
            run_order,
            run_order_random_seed,
        }
    }

    pub fn run_order(&self) -> RunOrder {
        self.run_order
    }

    pub fn run_order_random_seed(&self) -> Option<&str> {
        self.run_order_random_seed.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfiguration {
    reports_directory: PathBuf,
    #[serde(default)]
    trim_stack_trace: bool,
}

impl ReporterConfiguration {
    pub fn new(reports_directory: impl Into<PathBuf>, trim_stack_trace: bool) -> Self {
        Self {
            reports_directory: reports_directory.into(),
            trim_stack_trace,
        }
    }

    pub fn reports_directory(&self) -> &Path {
        &self.reports_directory
    }

    pub fn trim_stack_trace(&self) -> bool {
        self.trim_stack_trace
    }
}

/// Coordinates of the test framework artifact the provider was resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestArtifactInfo {
    version: String,
    #[serde(default)]
    classifier: Option<String>,
}

impl TestArtifactInfo {
    pub fn new(version: impl Into<String>, classifier: Option<String>) -> Self {
        Self {
            version: version.into(),
            classifier,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }
}

/// One `Class#method` selector out of a test filter expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPattern {
    pub class_pattern: String,
    pub method_pattern: Option<String>,
}

/// User supplied test filter such as `MyTest#shouldWork,Other*`.
///
/// The expression is transported verbatim; [`patterns`](Self::patterns) is
/// a convenience view for engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestListResolver(String);

impl TestListResolver {
    pub fn new(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    pub fn expression(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn patterns(&self) -> Vec<TestPattern> {
        self.0
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('#') {
                Some((class, method)) => TestPattern {
                    class_pattern: class.to_string(),
                    method_pattern: Some(method.to_string()).filter(|m| !m.is_empty()),
                },
                None => TestPattern {
                    class_pattern: part.to_string(),
                    method_pattern: None,
                },
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRequest {
    #[serde(default)]
    suite_xml_files: Vec<PathBuf>,
    test_source_directory: PathBuf,
    #[serde(default)]
    test_list_resolver: TestListResolver,
}

impl TestRequest {
    pub fn new(
        suite_xml_files: Vec<PathBuf>,
        test_source_directory: impl Into<PathBuf>,
        test_list_resolver: TestListResolver,
    ) -> Self {
        Self {
            suite_xml_files,
            test_source_directory: test_source_directory.into(),
            test_list_resolver,
        }
    }

    pub fn suite_xml_files(&self) -> &[PathBuf] {
        &self.suite_xml_files
    }

    pub fn test_source_directory(&self) -> &Path {
        &self.test_source_directory
    }

    pub fn test_list_resolver(&self) -> &TestListResolver {
        &self.test_list_resolver
    }
}

/// A value tagged with the kind the worker should interpret it as, e.g. a
/// single test class assigned to one fork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeEncodedValue {
    pub kind: String,
    pub value: String,
}

impl TypeEncodedValue {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// Everything the provider inside the worker needs to find, order, run and
/// report tests.
///
/// Required parts go through [`new`](Self::new); the remaining settings
/// start at their defaults and are adjusted with the `with_*` methods
/// before the value is handed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfiguration {
    directory_scan: DirectoryScanParameters,
    #[serde(default)]
    run_order: RunOrderParameters,
    reporter: ReporterConfiguration,
    test_artifact: TestArtifactInfo,
    test_request: TestRequest,
    #[serde(default)]
    provider_properties: BTreeMap<String, String>,
    #[serde(default)]
    fail_fast: bool,
    #[serde(default)]
    main_cli_options: Vec<CommandLineOption>,
    #[serde(default)]
    rerun_failing_tests_count: u32,
    #[serde(default)]
    skip_after_failure_count: u32,
    #[serde(default)]
    shutdown: Shutdown,
    #[serde(default)]
    forked_process_timeout_in_seconds: u32,
    #[serde(default)]
    read_tests_from_in_stream: bool,
    #[serde(default)]
    test_for_fork: Option<TypeEncodedValue>,
}

impl ProviderConfiguration {
    pub fn new(
        directory_scan: DirectoryScanParameters,
        run_order: RunOrderParameters,
        reporter: ReporterConfiguration,
        test_artifact: TestArtifactInfo,
        test_request: TestRequest,
    ) -> Self {
        Self {
            directory_scan,
            run_order,
            reporter,
            test_artifact,
            test_request,
            provider_properties: BTreeMap::new(),
            fail_fast: false,
            main_cli_options: Vec::new(),
            rerun_failing_tests_count: 0,
            skip_after_failure_count: 0,
            shutdown: Shutdown::Default,
            forked_process_timeout_in_seconds: 0,
            read_tests_from_in_stream: false,
            test_for_fork: None,
        }
    }

    pub fn with_provider_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.provider_properties = properties;
        self
    }

    pub fn with_provider_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.provider_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_main_cli_options(mut self, options: Vec<CommandLineOption>) -> Self {
        self.main_cli_options = options;
        self
    }

    pub fn with_rerun_failing_tests_count(mut self, count: u32) -> Self {
        self.rerun_failing_tests_count = count;
        self
    }

    pub fn with_skip_after_failure_count(mut self, count: u32) -> Self {
        self.skip_after_failure_count = count;
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_forked_process_timeout_in_seconds(mut self, seconds: u32) -> Self {
        self.forked_process_timeout_in_seconds = seconds;
        self
    }

    pub fn with_read_tests_from_in_stream(mut self, read: bool) -> Self {
        self.read_tests_from_in_stream = read;
        self
    }

    pub fn with_test_for_fork(mut self, test: Option<TypeEncodedValue>) -> Self {
        self.test_for_fork = test;
        self
    }

    pub fn directory_scan(&self) -> &DirectoryScanParameters {
        &self.directory_scan
    }

    pub fn run_order(&self) -> &RunOrderParameters {
        &self.run_order
    }

    pub fn reporter(&self) -> &ReporterConfiguration {
        &self.reporter
    }

    pub fn test_artifact(&self) -> &TestArtifactInfo {
        &self.test_artifact
    }

    pub fn test_request(&self) -> &TestRequest {
        &self.test_request
    }

    pub fn provider_properties(&self) -> &BTreeMap<String, String> {
        &self.provider_properties
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub fn main_cli_options(&self) -> &[CommandLineOption] {
        &self.main_cli_options
    }

    pub fn rerun_failing_tests_count(&self) -> u32 {
        self.rerun_failing_tests_count
    }

    pub fn skip_after_failure_count(&self) -> u32 {
        self.skip_after_failure_count
    }

    pub fn shutdown(&self) -> Shutdown {
        self.shutdown
    }

    /// Zero means the worker runs without a timeout.
    pub fn forked_process_timeout_in_seconds(&self) -> u32 {
        self.forked_process_timeout_in_seconds
    }

    pub fn read_tests_from_in_stream(&self) -> bool {
        self.read_tests_from_in_stream
    }

    pub fn test_for_fork(&self) -> Option<&TypeEncodedValue> {
        self.test_for_fork.as_ref()
    }
}
