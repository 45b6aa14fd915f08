use clap::Parser;
use forkboot::Cli;
use forkboot_core::error::EXIT_OTHER;

fn main() {
    // Initialize tracing based on RUST_LOG env var. Stdout belongs to the
    // commands, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command.execute() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            e.downcast_ref::<forkboot_core::Error>()
                .map(forkboot_core::Error::exit_code)
                .unwrap_or(EXIT_OTHER)
        }
    };
    std::process::exit(code);
}
