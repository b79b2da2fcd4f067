use deskshare_core::{IceCandidate, ParticipantId};
use std::collections::HashMap;

/// Remote candidates that arrived before the description they belong to was installed.
#[derive(Debug, Default)]
pub struct CandidateBuffer {
    pending: HashMap<ParticipantId, Vec<IceCandidate>>,
}

impl CandidateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, remote: ParticipantId, candidate: IceCandidate) {
        self.pending.entry(remote).or_default().push(candidate);
    }

    /// Remove and return everything held for `remote`, in arrival order.
    pub fn take(&mut self, remote: &ParticipantId) -> Vec<IceCandidate> {
        self.pending.remove(remote).unwrap_or_default()
    }

    pub fn clear(&mut self, remote: &ParticipantId) {
        self.pending.remove(remote);
    }

    pub fn len_for(&self, remote: &ParticipantId) -> usize {
        self.pending.get(remote).map_or(0, Vec::len)
    }

    pub fn contains(&self, remote: &ParticipantId) -> bool {
        self.pending.contains_key(remote)
    }
}
