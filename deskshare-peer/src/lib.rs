mod error;
mod negotiation;
mod relay;
mod session;
mod transport;

pub use error::PeerError;
pub use negotiation::*;
pub use relay::*;
pub use session::*;
pub use transport::*;
