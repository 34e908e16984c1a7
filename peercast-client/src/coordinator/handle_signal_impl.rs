use peercast_core::{MessageKind, SignalMessage};

use crate::channel::ChannelEvent;
use crate::coordinator::{Coordinator, NegotiationPhase};
use crate::error::{ChannelError, SessionError};

impl Coordinator {
    pub(super) async fn on_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Open => self.settle(),

            ChannelEvent::Message(msg) => {
                // Failures are already in the session log.
                let _ = self.on_relay_message(msg).await;
            }

            ChannelEvent::Closed(reason) => {
                if self.phase == Some(NegotiationPhase::Stable) {
                    self.log.info(format!(
                        "Relay closed ({}); peer session continues",
                        reason.as_deref().unwrap_or("no reason")
                    ));
                    self.settle();
                } else {
                    self.fail_channel(ChannelError::Closed);
                }
            }

            ChannelEvent::Failed(e) => {
                self.fail_channel(e);
            }
        }
    }

    /// Dispatches one inbound relay message.
    ///
    /// Messages for another session code are discarded. Unknown types are
    /// logged once and otherwise ignored.
    pub async fn on_relay_message(&mut self, msg: SignalMessage) -> Result<(), SessionError> {
        if !self.is_alive() {
            return Err(SessionError::TornDown);
        }
        if !self.config.code.matches(msg.code.as_deref()) {
            self.log.warn(format!(
                "[relay] Discarding `{}` for session {}",
                msg.kind,
                msg.code.as_deref().unwrap_or("<none>")
            ));
            return Ok(());
        }

        match msg.kind {
            MessageKind::JoinAck => {
                self.log.info(format!(
                    "Join acknowledged: {}",
                    msg.message.as_deref().unwrap_or_default()
                ));
                Ok(())
            }

            MessageKind::Error => {
                self.log.error(format!(
                    "Error from server: {}",
                    msg.message.as_deref().unwrap_or_default()
                ));
                Ok(())
            }

            MessageKind::Join => {
                self.log.debug("[relay] Peer joined");
                Ok(())
            }

            MessageKind::Offer => {
                self.gate()?;
                self.handle_remote_offer(msg).await
            }

            MessageKind::Answer => {
                self.gate()?;
                self.handle_answer(msg).await
            }

            MessageKind::IceCandidate => {
                self.gate()?;
                self.handle_remote_candidate(msg).await
            }

            MessageKind::Other(tag) => {
                self.log
                    .warn(format!("[relay] Unknown message type: {}", tag));
                Ok(())
            }
        }
    }
}
