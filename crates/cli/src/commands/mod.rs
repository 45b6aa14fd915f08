pub mod descriptor;
pub mod encode;
pub mod inspect;
pub mod launch;
pub mod worker;

pub use descriptor::LaunchDescriptor;
pub use encode::encode_command;
pub use inspect::inspect_command;
pub use launch::launch_command;
pub use worker::{SummaryEngine, worker_command};
