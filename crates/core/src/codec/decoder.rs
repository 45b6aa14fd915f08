//! Rebuilds configuration value objects from a [`PropertyStore`]
//!
//! Every required key must be present; nothing is defaulted except values
//! the model declares optional, and those carry an explicit presence
//! sentinel. Keys the decoder does not know about are ignored.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::keys::{self, provider as pk, startup as sk};
use crate::error::{Error, Result};
use crate::model::{
    ClassLoaderConfiguration, Classpath, ClasspathConfiguration, DirectoryScanParameters,
    ForkContext, ProviderConfiguration, ReporterConfiguration, RunOrderParameters,
    StartupConfiguration, TestArtifactInfo, TestListResolver, TestRequest, TypeEncodedValue,
};
use crate::properties::{LIST_SIZE_SUFFIX, PropertyStore, join_key};

/// Decode the provider and startup configuration from `store`.
pub fn decode(store: &PropertyStore) -> Result<(ProviderConfiguration, StartupConfiguration)> {
    check_format_version(store)?;
    let startup = decode_startup(store)?;
    let provider = decode_provider(store)?;
    debug!(
        "Decoded configuration for provider {} from {} keys",
        startup.provider_class_name(),
        store.len()
    );
    Ok((provider, startup))
}

/// Decode the per-launch context written next to the configuration.
pub fn decode_fork_context(store: &PropertyStore) -> Result<ForkContext> {
    Ok(ForkContext {
        fork_number: store.get_u32(keys::FORK_NUMBER)?,
        plugin_pid: store.get_nullable_u32(keys::FORK_PLUGIN_PID)?,
    })
}

fn check_format_version(store: &PropertyStore) -> Result<()> {
    let version = store.get_int(keys::FORMAT_VERSION)?;
    if version > keys::CURRENT_FORMAT_VERSION {
        warn!(
            "Configuration was written with format version {}, this worker understands {}; unknown keys are ignored",
            version,
            keys::CURRENT_FORMAT_VERSION
        );
    }
    Ok(())
}

fn decode_startup(store: &PropertyStore) -> Result<StartupConfiguration> {
    let provider_class_name = store.get_string(sk::PROVIDER_CLASS_NAME)?;
    if provider_class_name.trim().is_empty() {
        return Err(Error::malformed(
            sk::PROVIDER_CLASS_NAME,
            provider_class_name,
            "a non-empty provider class name",
        ));
    }
    let classpath = decode_classpath_configuration(store)?;
    let class_loader = decode_class_loader_configuration(store)?;
    StartupConfiguration::new(
        provider_class_name,
        classpath,
        class_loader,
        store.get_bool(sk::FAIL_IF_NO_TESTS)?,
        store.get_bool(sk::IS_FORKING)?,
    )
}

fn decode_classpath_configuration(store: &PropertyStore) -> Result<ClasspathConfiguration> {
    Ok(ClasspathConfiguration::new(
        Classpath::new(store.get_string_list(sk::TEST_CLASSPATH)?),
        Classpath::new(store.get_string_list(sk::PROVIDER_CLASSPATH)?),
        Classpath::new(store.get_string_list(sk::ADDITIONAL_CLASSPATH)?),
        store.get_bool(sk::ENABLE_ASSERTIONS)?,
        store.get_bool(sk::CHILD_DELEGATION)?,
    ))
}

fn decode_class_loader_configuration(store: &PropertyStore) -> Result<ClassLoaderConfiguration> {
    Ok(ClassLoaderConfiguration::new(
        store.get_bool(sk::USE_SYSTEM_CLASS_LOADER)?,
        store.get_bool(sk::USE_MANIFEST_ONLY_JAR)?,
    ))
}

fn decode_provider(store: &PropertyStore) -> Result<ProviderConfiguration> {
    let provider = ProviderConfiguration::new(
        decode_directory_scan(store)?,
        decode_run_order(store)?,
        decode_reporter(store)?,
        decode_test_artifact(store)?,
        decode_test_request(store)?,
    )
    .with_provider_properties(decode_provider_properties(store)?)
    .with_fail_fast(store.get_bool(pk::FAIL_FAST)?)
    .with_main_cli_options(store.get_enum_list(pk::MAIN_CLI_OPTIONS)?)
    .with_rerun_failing_tests_count(store.get_u32(pk::RERUN_FAILING_TESTS_COUNT)?)
    .with_skip_after_failure_count(store.get_u32(pk::SKIP_AFTER_FAILURE_COUNT)?)
    .with_shutdown(store.get_enum(pk::SHUTDOWN)?)
    .with_forked_process_timeout_in_seconds(store.get_u32(pk::FORKED_PROCESS_TIMEOUT)?)
    .with_read_tests_from_in_stream(store.get_bool(pk::READ_TESTS_FROM_IN_STREAM)?)
    .with_test_for_fork(decode_test_for_fork(store)?);
    Ok(provider)
}

fn decode_directory_scan(store: &PropertyStore) -> Result<DirectoryScanParameters> {
    Ok(DirectoryScanParameters::new(
        PathBuf::from(store.get_string(pk::BASE_DIRECTORY)?),
        store.get_string_list(pk::INCLUDES)?,
        store.get_string_list(pk::EXCLUDES)?,
        store.get_string_list(pk::SPECIFIC_TESTS)?,
        store.get_bool(pk::SCAN_FAIL_IF_NO_TESTS)?,
        store.get_string(pk::SCAN_RUN_ORDER)?,
    ))
}

fn decode_run_order(store: &PropertyStore) -> Result<RunOrderParameters> {
    Ok(RunOrderParameters::new(
        store.get_enum(pk::RUN_ORDER)?,
        store.get_nullable_string(pk::RUN_ORDER_RANDOM_SEED)?,
    ))
}

fn decode_reporter(store: &PropertyStore) -> Result<ReporterConfiguration> {
    Ok(ReporterConfiguration::new(
        PathBuf::from(store.get_string(pk::REPORTS_DIRECTORY)?),
        store.get_bool(pk::TRIM_STACK_TRACE)?,
    ))
}

fn decode_test_artifact(store: &PropertyStore) -> Result<TestArtifactInfo> {
    Ok(TestArtifactInfo::new(
        store.get_string(pk::ARTIFACT_VERSION)?,
        store.get_nullable_string(pk::ARTIFACT_CLASSIFIER)?,
    ))
}

fn decode_test_request(store: &PropertyStore) -> Result<TestRequest> {
    let suite_xml_files = store
        .get_string_list(pk::SUITE_XML_FILES)?
        .into_iter()
        .map(PathBuf::from)
        .collect();
    Ok(TestRequest::new(
        suite_xml_files,
        PathBuf::from(store.get_string(pk::TEST_SOURCE_DIRECTORY)?),
        TestListResolver::new(store.get_string(pk::TEST_LIST_RESOLVER)?),
    ))
}

fn decode_provider_properties(store: &PropertyStore) -> Result<BTreeMap<String, String>> {
    let size = store.get_u32(&join_key(pk::PROPERTIES, LIST_SIZE_SUFFIX))?;
    let mut properties = BTreeMap::new();
    for i in 0..size {
        let entry = join_key(pk::PROPERTIES, &i.to_string());
        let key = store.get_string(&join_key(&entry, "key"))?;
        let value = store.get_string(&join_key(&entry, "value"))?;
        properties.insert(key.to_string(), value.to_string());
    }
    Ok(properties)
}

fn decode_test_for_fork(store: &PropertyStore) -> Result<Option<TypeEncodedValue>> {
    if !store.is_present(pk::TEST_FOR_FORK)? {
        return Ok(None);
    }
    Ok(Some(TypeEncodedValue::new(
        store.get_string(pk::TEST_FOR_FORK_KIND)?,
        store.get_string(pk::TEST_FOR_FORK_VALUE)?,
    )))
}
