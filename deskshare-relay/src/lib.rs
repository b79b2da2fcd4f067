mod hub;
mod relay;
mod room;
mod signaling;

pub use hub::*;
pub use relay::*;
pub use room::*;
pub use signaling::*;
