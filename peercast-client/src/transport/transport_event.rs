use crate::media::RemoteStream;
use peercast_core::CandidateDescriptor;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

/// Events the peer-transport engine raises for the coordinator.
#[derive(Debug)]
pub enum PeerEvent {
    /// A local network-path candidate was discovered and must reach the remote side.
    LocalCandidate(CandidateDescriptor),

    /// Inbound media arrived.
    RemoteTrack(RemoteStream),

    ConnectionState(RTCPeerConnectionState),
}
