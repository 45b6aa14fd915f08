use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{encode_command, inspect_command, launch_command, worker_command};

#[derive(Parser, Debug)]
#[command(name = "forkboot")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a JSON launch descriptor into a transport file
    #[command(visible_alias = "e")]
    Encode {
        /// Path to the descriptor ({"provider": .., "startup": .., "fork": ..})
        descriptor: PathBuf,

        /// Directory for the transport file (defaults to the configured work_dir)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Decode a transport file and print the configuration
    #[command(visible_alias = "i")]
    Inspect {
        /// Path to the transport file
        file: PathBuf,

        /// Print the decoded configuration as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Boot as a worker from a transport file
    Worker {
        /// Path to the transport file
        file: PathBuf,

        /// Process id of the parent to watch
        pid: Option<String>,
    },
    /// Encode a descriptor, spawn a worker for it and wait
    ///
    /// The descriptor's `fork` section is ignored: forks are numbered from 1
    /// and the worker watches this process.
    #[command(visible_alias = "l")]
    Launch {
        /// Path to the descriptor
        descriptor: PathBuf,

        /// Keep the transport file after the worker exits
        #[arg(short, long)]
        keep_files: bool,
    },
}

impl Commands {
    /// Execute the command, returning the process exit status
    pub fn execute(self) -> Result<i32> {
        match self {
            Commands::Encode {
                descriptor,
                out_dir,
            } => encode_command(&descriptor, out_dir.as_deref()),
            Commands::Inspect { file, json } => inspect_command(&file, json),
            Commands::Worker { file, pid } => Ok(worker_command(file, pid)),
            Commands::Launch {
                descriptor,
                keep_files,
            } => launch_command(&descriptor, keep_files),
        }
    }
}
