use std::fmt;

/// Per-remote negotiation progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    Idle,
    /// Local offer sent, waiting for the answer.
    Offering,
    /// Remote offer being answered.
    Answering,
    Connected,
    Closed,
    Failed,
}

impl NegotiationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }

    pub fn can_transition_to(&self, next: NegotiationState) -> bool {
        use NegotiationState::*;

        if self.is_terminal() {
            return false;
        }

        matches!(
            (*self, next),
            (Idle, Offering)
                | (Idle, Answering)
                | (Offering, Connected)
                | (Answering, Connected)
                // Renegotiation offered by the remote side.
                | (Connected, Answering)
                | (_, Closed)
                | (_, Failed)
        )
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Offering => "offering",
            Self::Answering => "answering",
            Self::Connected => "connected",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
