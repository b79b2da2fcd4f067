pub mod mock_relay_output;

pub use mock_relay_output::*;
pub use mock_transport::*;
pub use relay_harness::*;
pub use test_peer::*;
