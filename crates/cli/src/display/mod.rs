pub mod command_breakdown;
pub mod configuration;

pub use command_breakdown::print_command_breakdown;
pub use configuration::print_configuration;
