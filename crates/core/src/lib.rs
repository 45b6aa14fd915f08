//! forkboot - Hand a test run's configuration from a parent process to a
//! forked worker through a flat properties file
//!
//! This crate provides functionality to:
//! - Encode provider and startup configuration into an ordered key/value store
//! - Persist the store to a uniquely named file and clean it up afterwards
//! - Decode the file inside the worker and hand it to a test engine
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod handoff;
pub mod launcher;
pub mod model;
pub mod properties;
pub mod transport;
pub mod utils;
pub mod worker;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use model::*;
pub use properties::PropertyStore;

// Re-export main API components
pub use codec::{decode, decode_fork_context, encode, encode_with_context};
pub use command::{WorkerCommand, WorkerExit, WorkerInvocation, WorkerSpawner};
pub use config::ForkSettings;
pub use handoff::{Handoff, HandoffPhase, Phase, WorkerPhase};
pub use launcher::{ForkLauncher, WorkerOutcome};
pub use transport::{ForkTransport, TransportHandle, remove_transport_file};
pub use utils::StableName;
pub use worker::{BootedConfiguration, EngineReport, TestEngine, WorkerArgs, boot, run_worker};
