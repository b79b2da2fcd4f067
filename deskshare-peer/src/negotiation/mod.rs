mod candidate_buffer;
mod negotiator;
mod record;
mod state;

pub use candidate_buffer::CandidateBuffer;
pub use negotiator::{InputCallback, Negotiator};
pub use record::RemoteConnection;
pub use state::NegotiationState;
