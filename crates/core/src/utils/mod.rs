mod serde_helpers;

pub use serde_helpers::StableName;
