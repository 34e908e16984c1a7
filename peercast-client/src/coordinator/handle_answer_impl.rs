use peercast_core::{Role, SignalMessage};

use crate::coordinator::{Coordinator, NegotiationPhase};
use crate::error::SessionError;

impl Coordinator {
    pub(super) async fn handle_answer(&mut self, msg: SignalMessage) -> Result<(), SessionError> {
        if self.role != Some(Role::Broadcaster) {
            return Err(self.protocol_violation("answer received by the viewer"));
        }
        match self.phase {
            Some(NegotiationPhase::OfferSent) => {}
            Some(NegotiationPhase::Stable) => {
                self.log
                    .debug(format!("Ignoring stale answer (round {})", self.round));
                return Ok(());
            }
            _ => {
                return Err(self.protocol_violation("answer received before an offer was sent"));
            }
        }
        let Some(answer) = msg.session_description() else {
            return Err(self.protocol_violation("answer without a session description"));
        };

        self.log.info("Received answer");
        let peer = self.peer()?;
        self.negotiate(peer.set_remote_description(answer.clone()))
            .await?;
        self.remote_description = Some(answer);
        self.flush_pending(&peer).await;

        self.phase = Some(NegotiationPhase::Stable);
        self.settle();
        Ok(())
    }
}
