use peercast_core::CandidateDescriptor;

/// Remote candidates that arrived before the remote description.
///
/// Append-only until taken; taking drains everything in arrival order.
#[derive(Debug, Default)]
pub struct PendingCandidates {
    items: Vec<CandidateDescriptor>,
}

impl PendingCandidates {
    pub fn push(&mut self, candidate: CandidateDescriptor) {
        self.items.push(candidate);
    }

    pub fn take(&mut self) -> Vec<CandidateDescriptor> {
        std::mem::take(&mut self.items)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
