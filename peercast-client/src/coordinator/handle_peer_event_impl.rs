use peercast_core::{CandidateDescriptor, MessageKind};
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

use crate::channel::ChannelState;
use crate::coordinator::Coordinator;
use crate::error::SessionError;
use crate::media::RemoteStream;
use crate::transport::PeerEvent;

impl Coordinator {
    pub async fn on_peer_event(&mut self, event: PeerEvent) {
        if !self.is_alive() {
            return;
        }

        match event {
            PeerEvent::LocalCandidate(candidate) => {
                let _ = self.on_local_candidate_discovered(candidate);
            }
            PeerEvent::RemoteTrack(stream) => self.on_remote_track_received(stream),
            PeerEvent::ConnectionState(s) => match s {
                RTCPeerConnectionState::Failed | RTCPeerConnectionState::Disconnected => {
                    self.log.warn(format!("[peer] Connection state: {}", s))
                }
                _ => self.log.info(format!("[peer] Connection state: {}", s)),
            },
        }
    }

    /// Forwards a locally discovered candidate to the remote side.
    pub fn on_local_candidate_discovered(
        &mut self,
        candidate: CandidateDescriptor,
    ) -> Result<(), SessionError> {
        self.gate()?;

        match self.channel.state() {
            ChannelState::Closed | ChannelState::Failed => {
                self.log.debug("[local] Relay gone, dropping ICE candidate");
                Ok(())
            }
            ChannelState::Open => {
                self.send(MessageKind::IceCandidate, Some(candidate.0))?;
                self.log.info("[local] Sent ICE candidate");
                Ok(())
            }
            ChannelState::Idle | ChannelState::Connecting => {
                self.send(MessageKind::IceCandidate, Some(candidate.0))?;
                self.log.debug("[local] Queued ICE candidate until relay connects");
                Ok(())
            }
        }
    }

    pub fn on_remote_track_received(&mut self, stream: RemoteStream) {
        self.log.info(format!(
            "[remote] Received {} track {} (stream {})",
            stream.kind, stream.track_id, stream.stream_id
        ));
        self.collaborators.presenter.show_remote(stream);
    }
}
