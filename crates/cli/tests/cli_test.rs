use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DESCRIPTOR: &str = r#"{
  "provider": {
    "directory_scan": {
      "base_directory": "target/test-classes",
      "includes": ["**/*Test.java"],
      "excludes": ["**/*$*"],
      "fail_if_no_tests": true,
      "run_order": "hourly"
    },
    "run_order": { "run_order": "alphabetical" },
    "reporter": { "reports_directory": "target/reports", "trim_stack_trace": true },
    "test_artifact": { "version": "5.0", "classifier": "ABC" },
    "test_request": {
      "suite_xml_files": ["A1", "A2"],
      "test_source_directory": "TestSrc",
      "test_list_resolver": "aUserRequestedTest#aUserRequestedTestMethod"
    },
    "provider_properties": { "user.dir": "/work" },
    "main_cli_options": ["show_errors", "logging_level_debug"],
    "shutdown": "kill"
  },
  "startup": {
    "provider_class_name": "com.provider",
    "classpath_configuration": {
      "test_classpath": ["CP1", "CP2"],
      "provider_classpath": ["SP1", "SP2"],
      "enable_assertions": true,
      "child_delegation": true
    },
    "class_loader_configuration": {
      "use_system_class_loader": true,
      "use_manifest_only_jar": true
    },
    "fail_if_no_tests": true,
    "is_forking": true
  },
  "fork": { "fork_number": 3, "plugin_pid": 4242 }
}"#;

fn forkboot() -> Command {
    Command::cargo_bin("forkboot").unwrap()
}

fn write_descriptor(dir: &Path) -> PathBuf {
    let path = dir.join("launch.json");
    std::fs::write(&path, DESCRIPTOR).unwrap();
    path
}

fn encode(dir: &TempDir) -> PathBuf {
    let descriptor = write_descriptor(dir.path());
    let out_dir = dir.path().join("out");
    let output = forkboot()
        .arg("encode")
        .arg(&descriptor)
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .unwrap();
    assert!(output.status.success());
    PathBuf::from(String::from_utf8(output.stdout).unwrap().trim())
}

#[test]
fn test_encode_then_inspect() {
    let temp_dir = TempDir::new().unwrap();
    let file = encode(&temp_dir);
    assert!(file.exists());
    assert!(file.starts_with(temp_dir.path().join("out")));

    let contents = std::fs::read_to_string(&file).unwrap();
    assert!(contents.contains("startup.providerClassName=com.provider"));

    let output = forkboot()
        .arg("inspect")
        .arg(&file)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["startup"]["provider_class_name"], "com.provider");
    assert_eq!(
        json["startup"]["classpath_configuration"]["test_classpath"],
        serde_json::json!(["CP1", "CP2"])
    );
    assert_eq!(json["provider"]["shutdown"], "kill");
    assert_eq!(json["fork"]["fork_number"], 3);
    assert_eq!(json["fork"]["plugin_pid"], 4242);
}

#[test]
fn test_inspect_human_output() {
    let temp_dir = TempDir::new().unwrap();
    let file = encode(&temp_dir);

    forkboot()
        .arg("inspect")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("provider: com.provider"))
        .stdout(predicate::str::contains("manifest-only jar: true"));
}

#[test]
fn test_worker_boots_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = encode(&temp_dir);

    forkboot()
        .arg("worker")
        .arg(&file)
        .arg("77")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("watching pid 77"));

    // The parent owns the file
    assert!(file.exists());
}

#[test]
fn test_worker_failure_classes() {
    let temp_dir = TempDir::new().unwrap();

    forkboot()
        .arg("worker")
        .arg(temp_dir.path().join("missing.properties"))
        .assert()
        .code(10);

    let garbage = temp_dir.path().join("garbage.properties");
    std::fs::write(&garbage, "this line has no separator\n").unwrap();
    forkboot().arg("worker").arg(&garbage).assert().code(11);

    let corrupt = temp_dir.path().join("corrupt.properties");
    std::fs::write(&corrupt, "booter.formatVersion=1\n").unwrap();
    forkboot().arg("worker").arg(&corrupt).assert().code(12);
    forkboot().arg("inspect").arg(&corrupt).assert().code(12);
}

#[test]
fn test_launch_spawns_worker_and_cleans_up() {
    let temp_dir = TempDir::new().unwrap();
    let descriptor = write_descriptor(temp_dir.path());
    std::fs::write(
        temp_dir.path().join(".forkboot.json"),
        r#"{ "work_dir": "forks" }"#,
    )
    .unwrap();

    forkboot()
        .current_dir(temp_dir.path())
        .arg("launch")
        .arg(&descriptor)
        .assert()
        .success()
        .stdout(predicate::str::contains("provider: com.provider"))
        .stdout(predicate::str::contains("Fork 1 (watching pid"))
        .stdout(predicate::str::contains("watching pid 4242").not())
        .stdout(predicate::str::contains("Fork 1 finished, transport file removed"));

    let forks = temp_dir.path().join("forks");
    assert_eq!(std::fs::read_dir(forks).unwrap().count(), 0);
}

#[test]
fn test_encode_rejects_blank_provider() {
    let temp_dir = TempDir::new().unwrap();
    let descriptor = temp_dir.path().join("blank.json");
    std::fs::write(
        &descriptor,
        DESCRIPTOR.replace("\"com.provider\"", "\"  \""),
    )
    .unwrap();

    forkboot()
        .arg("encode")
        .arg(&descriptor)
        .arg("--out-dir")
        .arg(temp_dir.path().join("out"))
        .assert()
        .code(13);
    assert!(!temp_dir.path().join("out").exists());
}
