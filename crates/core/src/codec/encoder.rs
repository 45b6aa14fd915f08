//! Flattens configuration value objects into a [`PropertyStore`]

use std::path::Path;

use tracing::debug;

use super::keys::{self, provider as pk, startup as sk};
use crate::error::{Error, Result};
use crate::model::{
    ClassLoaderConfiguration, ClasspathConfiguration, DirectoryScanParameters, ForkContext,
    ProviderConfiguration, ReporterConfiguration, RunOrderParameters, StartupConfiguration,
    TestArtifactInfo, TestRequest,
};
use crate::properties::{PropertyStore, join_key};

/// Encode both configurations with a default fork context.
pub fn encode(
    provider: &ProviderConfiguration,
    startup: &StartupConfiguration,
) -> Result<PropertyStore> {
    encode_with_context(provider, startup, &ForkContext::default())
}

/// Encode both configurations plus the per-launch context into one store.
///
/// The output depends only on the inputs: the same values always produce
/// the same keys in the same order.
pub fn encode_with_context(
    provider: &ProviderConfiguration,
    startup: &StartupConfiguration,
    context: &ForkContext,
) -> Result<PropertyStore> {
    startup.validate()?;

    let mut store = PropertyStore::new();
    store.set_int(keys::FORMAT_VERSION, keys::CURRENT_FORMAT_VERSION)?;
    encode_fork_context(&mut store, context)?;
    encode_startup(&mut store, startup)?;
    encode_provider(&mut store, provider)?;

    debug!(
        "Encoded configuration for provider {} into {} keys",
        startup.provider_class_name(),
        store.len()
    );
    Ok(store)
}

fn encode_fork_context(store: &mut PropertyStore, context: &ForkContext) -> Result<()> {
    store.set_int(keys::FORK_NUMBER, i64::from(context.fork_number))?;
    store.set_nullable_u32(keys::FORK_PLUGIN_PID, context.plugin_pid)
}

fn encode_startup(store: &mut PropertyStore, startup: &StartupConfiguration) -> Result<()> {
    store.set_string(sk::PROVIDER_CLASS_NAME, startup.provider_class_name())?;
    store.set_bool(sk::FAIL_IF_NO_TESTS, startup.fail_if_no_tests())?;
    store.set_bool(sk::IS_FORKING, startup.is_forking())?;
    encode_classpath_configuration(store, startup.classpath_configuration())?;
    encode_class_loader_configuration(store, startup.class_loader_configuration())
}

fn encode_classpath_configuration(
    store: &mut PropertyStore,
    config: &ClasspathConfiguration,
) -> Result<()> {
    store.set_string_list(sk::TEST_CLASSPATH, config.test_classpath().entries())?;
    store.set_string_list(sk::PROVIDER_CLASSPATH, config.provider_classpath().entries())?;
    store.set_string_list(sk::ADDITIONAL_CLASSPATH, config.additional_classpath().entries())?;
    store.set_bool(sk::ENABLE_ASSERTIONS, config.enable_assertions())?;
    store.set_bool(sk::CHILD_DELEGATION, config.child_delegation())
}

fn encode_class_loader_configuration(
    store: &mut PropertyStore,
    config: &ClassLoaderConfiguration,
) -> Result<()> {
    store.set_bool(sk::USE_SYSTEM_CLASS_LOADER, config.use_system_class_loader())?;
    store.set_bool(sk::USE_MANIFEST_ONLY_JAR, config.use_manifest_only_jar())
}

fn encode_provider(store: &mut PropertyStore, provider: &ProviderConfiguration) -> Result<()> {
    encode_directory_scan(store, provider.directory_scan())?;
    encode_run_order(store, provider.run_order())?;
    encode_reporter(store, provider.reporter())?;
    encode_test_artifact(store, provider.test_artifact())?;
    encode_test_request(store, provider.test_request())?;

    let properties = provider.provider_properties();
    store.set_int(
        &join_key(pk::PROPERTIES, crate::properties::LIST_SIZE_SUFFIX),
        properties.len() as i64,
    )?;
    for (i, (key, value)) in properties.iter().enumerate() {
        let entry = join_key(pk::PROPERTIES, &i.to_string());
        store.set_string(&join_key(&entry, "key"), key)?;
        store.set_string(&join_key(&entry, "value"), value)?;
    }

    store.set_bool(pk::FAIL_FAST, provider.fail_fast())?;
    store.set_enum_list(pk::MAIN_CLI_OPTIONS, provider.main_cli_options())?;
    store.set_int(
        pk::RERUN_FAILING_TESTS_COUNT,
        i64::from(provider.rerun_failing_tests_count()),
    )?;
    store.set_int(
        pk::SKIP_AFTER_FAILURE_COUNT,
        i64::from(provider.skip_after_failure_count()),
    )?;
    store.set_enum(pk::SHUTDOWN, provider.shutdown())?;
    store.set_int(
        pk::FORKED_PROCESS_TIMEOUT,
        i64::from(provider.forked_process_timeout_in_seconds()),
    )?;
    store.set_bool(pk::READ_TESTS_FROM_IN_STREAM, provider.read_tests_from_in_stream())?;

    match provider.test_for_fork() {
        Some(test) => {
            store.set_present(pk::TEST_FOR_FORK, true)?;
            store.set_string(pk::TEST_FOR_FORK_KIND, &test.kind)?;
            store.set_string(pk::TEST_FOR_FORK_VALUE, &test.value)?;
        }
        None => store.set_present(pk::TEST_FOR_FORK, false)?,
    }
    Ok(())
}

fn encode_directory_scan(store: &mut PropertyStore, scan: &DirectoryScanParameters) -> Result<()> {
    store.set_string(
        pk::BASE_DIRECTORY,
        path_str(pk::BASE_DIRECTORY, scan.base_directory())?,
    )?;
    store.set_string_list(pk::INCLUDES, scan.includes())?;
    store.set_string_list(pk::EXCLUDES, scan.excludes())?;
    store.set_string_list(pk::SPECIFIC_TESTS, scan.specific_tests())?;
    store.set_bool(pk::SCAN_FAIL_IF_NO_TESTS, scan.fail_if_no_tests())?;
    store.set_string(pk::SCAN_RUN_ORDER, scan.run_order())
}

fn encode_run_order(store: &mut PropertyStore, params: &RunOrderParameters) -> Result<()> {
    store.set_enum(pk::RUN_ORDER, params.run_order())?;
    store.set_nullable_string(pk::RUN_ORDER_RANDOM_SEED, params.run_order_random_seed())
}

fn encode_reporter(store: &mut PropertyStore, reporter: &ReporterConfiguration) -> Result<()> {
    store.set_string(
        pk::REPORTS_DIRECTORY,
        path_str(pk::REPORTS_DIRECTORY, reporter.reports_directory())?,
    )?;
    store.set_bool(pk::TRIM_STACK_TRACE, reporter.trim_stack_trace())
}

fn encode_test_artifact(store: &mut PropertyStore, artifact: &TestArtifactInfo) -> Result<()> {
    store.set_string(pk::ARTIFACT_VERSION, artifact.version())?;
    store.set_nullable_string(pk::ARTIFACT_CLASSIFIER, artifact.classifier())
}

fn encode_test_request(store: &mut PropertyStore, request: &TestRequest) -> Result<()> {
    let suite_files = request
        .suite_xml_files()
        .iter()
        .map(|path| path_str(pk::SUITE_XML_FILES, path))
        .collect::<Result<Vec<_>>>()?;
    store.set_string_list(pk::SUITE_XML_FILES, &suite_files)?;
    store.set_string(
        pk::TEST_SOURCE_DIRECTORY,
        path_str(pk::TEST_SOURCE_DIRECTORY, request.test_source_directory())?,
    )?;
    store.set_string(
        pk::TEST_LIST_RESOLVER,
        request.test_list_resolver().expression(),
    )
}

/// Paths travel as UTF-8 text; anything else cannot be written faithfully.
fn path_str<'a>(field: &str, path: &'a Path) -> Result<&'a str> {
    path.to_str()
        .ok_or_else(|| Error::encoding(field, format!("path {} is not valid UTF-8", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Classpath, CommandLineOption, RunOrder, Shutdown, TestListResolver, TypeEncodedValue,
    };

    fn startup() -> StartupConfiguration {
        StartupConfiguration::new(
            "com.provider",
            ClasspathConfiguration::new(
                Classpath::new(["CP1", "CP2"]),
                Classpath::new(["SP1", "SP2"]),
                Classpath::empty(),
                true,
                true,
            ),
            ClassLoaderConfiguration::new(true, false),
            false,
            true,
        )
        .unwrap()
    }

    fn provider() -> ProviderConfiguration {
        ProviderConfiguration::new(
            DirectoryScanParameters::new(".", vec![], vec![], vec![], true, "hourly"),
            RunOrderParameters::new(RunOrder::Default, None),
            ReporterConfiguration::new(".", true),
            TestArtifactInfo::new("5.0", Some("ABC".to_string())),
            TestRequest::new(
                vec!["A1".into(), "A2".into()],
                "TestSrc",
                TestListResolver::new("aUserRequestedTest#aUserRequestedTestMethod"),
            ),
        )
        .with_main_cli_options(vec![
            CommandLineOption::LoggingLevelDebug,
            CommandLineOption::ShowErrors,
            CommandLineOption::ReactorFailFast,
        ])
        .with_shutdown(Shutdown::Exit)
        .with_test_for_fork(Some(TypeEncodedValue::new("string", "aTest")))
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let first = encode(&provider(), &startup()).unwrap();
        let second = encode(&provider(), &startup()).unwrap();
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_key_layout() {
        let store = encode_with_context(&provider(), &startup(), &ForkContext::new(1, None)).unwrap();

        assert_eq!(store.find("booter.formatVersion"), Some("1"));
        assert_eq!(store.find("fork.number"), Some("1"));
        assert_eq!(store.find("fork.pluginPid.present"), Some("false"));
        assert_eq!(store.find("startup.providerClassName"), Some("com.provider"));
        assert_eq!(store.find("startup.classpath.testClasspath.size"), Some("2"));
        assert_eq!(store.find("startup.classpath.testClasspath.0"), Some("CP1"));
        assert_eq!(store.find("startup.classpath.testClasspath.1"), Some("CP2"));
        assert_eq!(store.find("startup.classpath.additionalClasspath.size"), Some("0"));
        assert_eq!(store.find("provider.reporter.reportsDirectory"), Some("."));
        assert_eq!(store.find("provider.testArtifact.classifier.present"), Some("true"));
        assert_eq!(store.find("provider.testArtifact.classifier"), Some("ABC"));
        assert_eq!(store.find("provider.runOrder.randomSeed.present"), Some("false"));
        assert_eq!(store.find("provider.shutdown"), Some("exit"));
        assert_eq!(store.find("provider.mainCliOptions.2"), Some("reactor_fail_fast"));
        assert_eq!(store.find("provider.testForFork.value"), Some("aTest"));
        assert_eq!(store.find("provider.properties.size"), Some("0"));
    }

    #[test]
    fn test_provider_properties_with_awkward_keys() {
        let provider = provider()
            .with_provider_property("with space", "x")
            .with_provider_property("multi", "a\nb");
        let store = encode(&provider, &startup()).unwrap();

        assert_eq!(store.find("provider.properties.size"), Some("2"));
        assert_eq!(store.find("provider.properties.0.key"), Some("multi"));
        assert_eq!(store.find("provider.properties.0.value"), Some("a\nb"));
        assert_eq!(store.find("provider.properties.1.key"), Some("with space"));
    }

    #[test]
    fn test_invalid_startup_fails_before_encoding() {
        let json = serde_json::json!({
            "provider_class_name": "",
            "classpath_configuration": {
                "test_classpath": [],
                "provider_classpath": [],
                "enable_assertions": false,
                "child_delegation": false
            },
            "class_loader_configuration": {
                "use_system_class_loader": false,
                "use_manifest_only_jar": false
            }
        });
        let startup: StartupConfiguration = serde_json::from_value(json).unwrap();
        let err = encode(&provider(), &startup).unwrap_err();
        assert!(matches!(err, Error::Encoding { .. }));
    }
}
