use std::sync::Arc;

use peercast_core::SignalMessage;

use crate::coordinator::Coordinator;
use crate::error::SessionError;
use crate::transport::PeerTransport;

impl Coordinator {
    /// Applies a remote candidate now, or queues it until the remote
    /// description is set. Candidates are never dropped.
    pub(super) async fn handle_remote_candidate(
        &mut self,
        msg: SignalMessage,
    ) -> Result<(), SessionError> {
        let Some(candidate) = msg.candidate() else {
            return Err(self.protocol_violation("ice-candidate without a candidate"));
        };

        let ready = match &self.peer {
            Some(peer) => peer.has_remote_description().await,
            None => false,
        };
        if !self.is_alive() {
            return Err(SessionError::TornDown);
        }
        if !ready {
            self.pending.push(candidate);
            self.log
                .info("Queuing ICE candidate (remote description not set)");
            return Ok(());
        }

        let peer = self.peer()?;
        match peer.add_ice_candidate(candidate).await {
            Ok(()) => {
                self.log.debug("Added ICE candidate");
                Ok(())
            }
            Err(e) => {
                self.log.warn(format!("Failed to add ICE candidate: {}", e));
                Err(SessionError::CandidateApply(e))
            }
        }
    }

    /// Applies every queued candidate in arrival order. Returns how many took.
    pub(super) async fn flush_pending(&mut self, peer: &Arc<dyn PeerTransport>) -> usize {
        let queued = self.pending.take();
        if queued.is_empty() {
            return 0;
        }

        self.log.info(format!(
            "Applying {} queued ICE candidate(s)",
            queued.len()
        ));
        let mut applied = 0;
        for candidate in queued {
            if !self.is_alive() {
                break;
            }
            match peer.add_ice_candidate(candidate).await {
                Ok(()) => applied += 1,
                Err(e) => self
                    .log
                    .warn(format!("Failed to add queued ICE candidate: {}", e)),
            }
        }
        applied
    }
}
