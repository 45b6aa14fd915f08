//! Encoder and decoder between the configuration model and a flat store

mod decoder;
mod encoder;
pub mod keys;

pub use decoder::{decode, decode_fork_context};
pub use encoder::{encode, encode_with_context};
