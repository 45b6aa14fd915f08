use forkboot_core::BootedConfiguration;

fn or_none(value: Option<&str>) -> &str {
    value.unwrap_or("<none>")
}

/// Human-readable summary of a decoded configuration.
pub fn print_configuration(config: &BootedConfiguration) {
    let startup = &config.startup;
    let provider = &config.provider;
    let classpath = startup.classpath_configuration();
    let loader = startup.class_loader_configuration();

    println!("{}", "=".repeat(80));
    println!(
        "🚀 Fork {} ({})",
        config.fork.fork_number,
        config
            .fork
            .plugin_pid
            .map(|pid| format!("watching pid {pid}"))
            .unwrap_or_else(|| "no parent pid".to_string())
    );

    println!("\n📦 Startup:");
    println!("   • provider: {}", startup.provider_class_name());
    println!(
        "   • test classpath: {}",
        classpath.effective_test_classpath().to_path_string()
    );
    println!(
        "   • provider classpath: {}",
        classpath.provider_classpath().to_path_string()
    );
    println!("   • assertions: {}", classpath.enable_assertions());
    println!("   • child delegation: {}", classpath.child_delegation());
    println!(
        "   • manifest-only jar: {}",
        startup.is_manifest_only_jar_requested_and_usable()
    );
    println!(
        "   • system class loader: {}",
        loader.use_system_class_loader()
    );
    println!("   • fail if no tests: {}", startup.fail_if_no_tests());

    let scan = provider.directory_scan();
    println!("\n🔍 Provider:");
    println!("   • base directory: {}", scan.base_directory().display());
    println!("   • includes: {:?}", scan.includes());
    println!("   • excludes: {:?}", scan.excludes());
    println!("   • run order: {}", provider.run_order().run_order());
    println!(
        "   • random seed: {}",
        or_none(provider.run_order().run_order_random_seed())
    );
    println!(
        "   • reports: {}",
        provider.reporter().reports_directory().display()
    );
    println!(
        "   • artifact: {} ({})",
        provider.test_artifact().version(),
        or_none(provider.test_artifact().classifier())
    );
    println!(
        "   • test filter: {}",
        provider.test_request().test_list_resolver().expression()
    );
    println!("   • fail fast: {}", provider.fail_fast());
    println!("   • shutdown: {}", provider.shutdown());
    println!(
        "   • rerun failing tests: {}",
        provider.rerun_failing_tests_count()
    );
    if !provider.main_cli_options().is_empty() {
        let options: Vec<String> = provider
            .main_cli_options()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("   • cli options: {}", options.join(", "));
    }
    for (key, value) in provider.provider_properties() {
        println!("   • property {} = {}", key, value);
    }
    println!("{}", "=".repeat(80));
}
