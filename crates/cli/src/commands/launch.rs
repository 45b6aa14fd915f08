use anyhow::{Context, Result};
use forkboot_core::error::EXIT_OTHER;
use forkboot_core::{ForkLauncher, ForkSettings, ForkTransport, WorkerCommand, WorkerInvocation};
use std::path::Path;
use tracing::{info, warn};

use super::LaunchDescriptor;
use crate::display::print_command_breakdown;

/// The current executable in worker mode.
fn default_worker() -> Result<WorkerCommand> {
    let exe = std::env::current_exe().context("Failed to locate current executable")?;
    Ok(WorkerCommand::new(exe.to_string_lossy()).with_arg("worker"))
}

pub fn launch_command(descriptor_path: &Path, keep_files: bool) -> Result<i32> {
    let descriptor = LaunchDescriptor::load(descriptor_path)?;
    if let Some(fork) = descriptor.fork {
        warn!(
            "Ignoring fork section of {} (fork {}); launch numbers forks itself",
            descriptor_path.display(),
            fork.fork_number
        );
    }
    let settings = ForkSettings::discover(&std::env::current_dir()?)?;

    let worker = match settings.worker {
        Some(worker) => worker,
        None => default_worker()?,
    };
    info!("Launching worker into {}", settings.work_dir.display());

    let plugin_pid = Some(std::process::id());
    let launcher = ForkLauncher::new(ForkTransport::new(&settings.work_dir)?, worker.clone())
        .keep_files(keep_files || settings.keep_files);
    let outcome = launcher.launch(&descriptor.provider, &descriptor.startup, plugin_pid)?;

    print_command_breakdown(
        &worker,
        &WorkerInvocation {
            config_path: outcome.config_path.clone(),
            plugin_pid,
            fork_number: outcome.fork_number,
        },
    );

    if outcome.cleaned {
        println!("✅ Fork {} finished, transport file removed", outcome.fork_number);
    } else {
        println!(
            "📁 Fork {} finished, transport file left at {}",
            outcome.fork_number,
            outcome.config_path.display()
        );
    }
    Ok(outcome.exit.code.unwrap_or(EXIT_OTHER))
}
