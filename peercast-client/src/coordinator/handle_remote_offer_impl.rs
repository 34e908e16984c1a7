use peercast_core::{MessageKind, Role, SignalMessage};

use crate::coordinator::{Coordinator, NegotiationPhase, SessionState};
use crate::error::SessionError;

impl Coordinator {
    pub(super) async fn handle_remote_offer(
        &mut self,
        msg: SignalMessage,
    ) -> Result<(), SessionError> {
        if let Err(e) = self.require_role(Role::Viewer) {
            self.log.warn("Ignoring offer: only the viewer answers");
            return Err(e);
        }
        let Some(offer) = msg.session_description() else {
            return Err(self.protocol_violation("offer without a session description"));
        };
        if self.remote_description.as_ref() == Some(&offer) {
            self.log.debug("Ignoring duplicate offer");
            return Ok(());
        }

        if self.state == SessionState::Connected {
            self.log.info("Received offer, renegotiating");
        } else {
            self.log.info("Received offer");
        }

        let peer = self.peer()?;
        self.round += 1;
        self.negotiate(peer.set_remote_description(offer.clone()))
            .await?;
        self.remote_description = Some(offer);
        self.flush_pending(&peer).await;

        let answer = self.negotiate(peer.create_answer()).await?;
        self.negotiate(peer.set_local_description(answer.clone()))
            .await?;

        self.send(MessageKind::Answer, Some(answer.0))?;
        self.phase = Some(NegotiationPhase::Stable);
        self.log
            .info(format!("[viewer] Sent answer (round {})", self.round));
        self.settle();
        Ok(())
    }
}
