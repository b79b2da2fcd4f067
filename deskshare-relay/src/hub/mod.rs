mod relay_command;
mod relay_hub;

pub use relay_command::*;
pub use relay_hub::*;
