use anyhow::Result;
use forkboot_core::error::EXIT_OK;
use forkboot_core::{WorkerArgs, boot};
use std::path::Path;

use crate::display::print_configuration;

pub fn inspect_command(file: &Path, json: bool) -> Result<i32> {
    let config = boot(&WorkerArgs {
        config_path: file.to_path_buf(),
        plugin_pid: None,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print_configuration(&config);
    }
    Ok(EXIT_OK)
}
