use peercast_core::{MessageKind, Role};

use crate::channel::ChannelState;
use crate::coordinator::{Coordinator, NegotiationPhase};
use crate::error::SessionError;

impl Coordinator {
    /// Captures the display, attaches its tracks and sends the offer.
    ///
    /// A capture failure is reported as [`SessionError::MediaAcquisition`] and
    /// no offer is sent. The session itself stays usable.
    pub async fn start_as_broadcaster(&mut self) -> Result<(), SessionError> {
        self.require_role(Role::Broadcaster)?;
        self.gate()?;
        if self.phase != Some(NegotiationPhase::Preparing) {
            return Err(self.protocol_violation("offer already sent for this session"));
        }

        let capture = self.collaborators.capture.clone();
        let stream = match capture
            .acquire_display_stream(&self.config.constraints)
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                self.log.error(format!("Error getting display media: {}", e));
                return Err(SessionError::MediaAcquisition(e));
            }
        };
        if let Err(e) = self.gate() {
            stream.stop();
            return Err(e);
        }
        self.local_stream = Some(stream.clone());

        self.log.info(format!(
            "[broadcaster] Got display stream {} ({} track(s))",
            stream.id,
            stream.tracks.len()
        ));
        self.collaborators.presenter.show_local(&stream);

        let peer = self.peer()?;
        for track in stream.tracks {
            self.negotiate(peer.add_track(track)).await?;
        }

        self.round += 1;
        let offer = self.negotiate(peer.create_offer()).await?;
        self.negotiate(peer.set_local_description(offer.clone()))
            .await?;

        self.send(MessageKind::Offer, Some(offer.0))?;
        self.phase = Some(NegotiationPhase::OfferSent);
        self.log.info(format!(
            "[broadcaster] Sent offer (round {})",
            self.round
        ));
        self.settle();
        Ok(())
    }

    /// Makes sure the relay connection is up; the offer arrives on its own.
    pub async fn start_as_viewer(&mut self) -> Result<(), SessionError> {
        self.require_role(Role::Viewer)?;
        self.gate()?;

        if self.channel.state() == ChannelState::Idle {
            self.channel
                .connect(Role::Viewer, self.collaborators.connector.clone());
            self.settle();
        }
        self.log.info("[viewer] Waiting for offer");
        Ok(())
    }
}
