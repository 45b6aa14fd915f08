//! Shared fixtures for the workspace integration tests

use forkboot_core::{
    ClassLoaderConfiguration, Classpath, ClasspathConfiguration, CommandLineOption,
    DirectoryScanParameters, ProviderConfiguration, ReporterConfiguration, RunOrder,
    RunOrderParameters, Shutdown, StartupConfiguration, TestArtifactInfo, TestListResolver,
    TestRequest, TypeEncodedValue,
};

pub const PROVIDER_CLASS_NAME: &str = "com.provider";
pub const USER_REQUESTED_TEST: &str = "aUserRequestedTest#aUserRequestedTestMethod";

pub fn classpath_configuration() -> ClasspathConfiguration {
    ClasspathConfiguration::new(
        Classpath::new(["CP1", "CP2"]),
        Classpath::new(["SP1", "SP2"]),
        Classpath::empty(),
        true,
        true,
    )
}

pub fn startup_configuration(class_loader: ClassLoaderConfiguration) -> StartupConfiguration {
    match StartupConfiguration::new(
        PROVIDER_CLASS_NAME,
        classpath_configuration(),
        class_loader,
        false,
        true,
    ) {
        Ok(startup) => startup,
        Err(e) => panic!("fixture startup configuration is invalid: {e}"),
    }
}

pub fn provider_configuration() -> ProviderConfiguration {
    let directory_scan = DirectoryScanParameters::new(
        "target/test-classes",
        vec!["**/*Test.java".to_string()],
        vec!["**/*$*".to_string()],
        vec![],
        true,
        "hourly",
    );

    ProviderConfiguration::new(
        directory_scan,
        RunOrderParameters::new(RunOrder::Random, Some("1234".to_string())),
        ReporterConfiguration::new("target/reports", true),
        TestArtifactInfo::new("5.0", Some("ABC".to_string())),
        TestRequest::new(
            vec!["A1".into(), "A2".into()],
            "TestSrc",
            TestListResolver::new(USER_REQUESTED_TEST),
        ),
    )
    .with_provider_property("user.dir", "/work")
    .with_provider_property("weird key=with:separators", "multi\nline")
    .with_main_cli_options(vec![
        CommandLineOption::ShowErrors,
        CommandLineOption::LoggingLevelDebug,
    ])
    .with_rerun_failing_tests_count(2)
    .with_skip_after_failure_count(5)
    .with_shutdown(Shutdown::Kill)
    .with_forked_process_timeout_in_seconds(30)
    .with_test_for_fork(Some(TypeEncodedValue::new("class", "com.example.FooTest")))
}
