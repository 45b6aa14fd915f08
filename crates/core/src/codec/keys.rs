//! Flat key names shared by the encoder and the decoder
//!
//! Nested objects are namespaces joined with `.`; lists and nullable values
//! add their own suffixes (see [`crate::properties`]).

pub const FORMAT_VERSION: &str = "booter.formatVersion";
/// Version written by this build. Readers accept older and newer files.
pub const CURRENT_FORMAT_VERSION: i64 = 1;

pub const FORK_NUMBER: &str = "fork.number";
pub const FORK_PLUGIN_PID: &str = "fork.pluginPid";

pub mod startup {
    pub const PROVIDER_CLASS_NAME: &str = "startup.providerClassName";
    pub const FAIL_IF_NO_TESTS: &str = "startup.failIfNoTests";
    pub const IS_FORKING: &str = "startup.isForking";

    pub const TEST_CLASSPATH: &str = "startup.classpath.testClasspath";
    pub const PROVIDER_CLASSPATH: &str = "startup.classpath.providerClasspath";
    pub const ADDITIONAL_CLASSPATH: &str = "startup.classpath.additionalClasspath";
    pub const ENABLE_ASSERTIONS: &str = "startup.classpath.enableAssertions";
    pub const CHILD_DELEGATION: &str = "startup.classpath.childDelegation";

    pub const USE_SYSTEM_CLASS_LOADER: &str = "startup.classLoader.useSystemClassLoader";
    pub const USE_MANIFEST_ONLY_JAR: &str = "startup.classLoader.useManifestOnlyJar";
}

pub mod provider {
    pub const BASE_DIRECTORY: &str = "provider.directoryScan.baseDirectory";
    pub const INCLUDES: &str = "provider.directoryScan.includes";
    pub const EXCLUDES: &str = "provider.directoryScan.excludes";
    pub const SPECIFIC_TESTS: &str = "provider.directoryScan.specificTests";
    pub const SCAN_FAIL_IF_NO_TESTS: &str = "provider.directoryScan.failIfNoTests";
    pub const SCAN_RUN_ORDER: &str = "provider.directoryScan.runOrder";

    pub const RUN_ORDER: &str = "provider.runOrder.runOrder";
    pub const RUN_ORDER_RANDOM_SEED: &str = "provider.runOrder.randomSeed";

    pub const REPORTS_DIRECTORY: &str = "provider.reporter.reportsDirectory";
    pub const TRIM_STACK_TRACE: &str = "provider.reporter.trimStackTrace";

    pub const ARTIFACT_VERSION: &str = "provider.testArtifact.version";
    pub const ARTIFACT_CLASSIFIER: &str = "provider.testArtifact.classifier";

    pub const SUITE_XML_FILES: &str = "provider.testRequest.suiteXmlFiles";
    pub const TEST_SOURCE_DIRECTORY: &str = "provider.testRequest.testSourceDirectory";
    pub const TEST_LIST_RESOLVER: &str = "provider.testRequest.testListResolver";

    /// Indexed pairs: `provider.properties.<i>.key` / `provider.properties.<i>.value`.
    pub const PROPERTIES: &str = "provider.properties";

    pub const FAIL_FAST: &str = "provider.failFast";
    pub const MAIN_CLI_OPTIONS: &str = "provider.mainCliOptions";
    pub const RERUN_FAILING_TESTS_COUNT: &str = "provider.rerunFailingTestsCount";
    pub const SKIP_AFTER_FAILURE_COUNT: &str = "provider.skipAfterFailureCount";
    pub const SHUTDOWN: &str = "provider.shutdown";
    pub const FORKED_PROCESS_TIMEOUT: &str = "provider.forkedProcessTimeoutInSeconds";
    pub const READ_TESTS_FROM_IN_STREAM: &str = "provider.readTestsFromInStream";

    pub const TEST_FOR_FORK: &str = "provider.testForFork";
    pub const TEST_FOR_FORK_KIND: &str = "provider.testForFork.kind";
    pub const TEST_FOR_FORK_VALUE: &str = "provider.testForFork.value";
}
