//! Settings for the parent process

mod settings;

pub use settings::{CONFIG_FILE_NAMES, ForkSettings};
