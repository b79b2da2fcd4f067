use deskshare_core::{ClientSignal, ParticipantId};

/// Commands fed into the relay hub by connection tasks.
#[derive(Debug)]
pub enum RelayCommand {
    /// A parsed signal from an attached participant.
    Signal {
        from: ParticipantId,
        signal: ClientSignal,
    },

    /// The participant's relay connection is gone.
    Disconnect { participant: ParticipantId },
}
