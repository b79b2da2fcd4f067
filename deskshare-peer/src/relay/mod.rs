mod relay_client;
mod relay_output;

pub use relay_client::RelayClient;
pub use relay_output::RelayOutput;
