use anyhow::Result;
use forkboot_core::error::EXIT_OK;
use forkboot_core::{ForkSettings, ForkTransport, encode_with_context};
use std::path::Path;
use tracing::debug;

use super::LaunchDescriptor;

pub fn encode_command(descriptor_path: &Path, out_dir: Option<&Path>) -> Result<i32> {
    debug!("Encoding descriptor: {}", descriptor_path.display());
    let descriptor = LaunchDescriptor::load(descriptor_path)?;

    let directory = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => ForkSettings::discover(&std::env::current_dir()?)?.work_dir,
    };

    let fork = descriptor.fork.unwrap_or_default();
    let store = encode_with_context(&descriptor.provider, &descriptor.startup, &fork)?;
    let handle = ForkTransport::new(directory)?.persist(&store)?;

    // Only the path goes to stdout so scripts can capture it
    println!("{}", handle.path().display());
    Ok(EXIT_OK)
}
