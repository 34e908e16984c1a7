mod connection_wrapper;
mod transport_config;
mod transport_event;

pub use connection_wrapper::{WebRtcTransport, WebRtcTransportFactory};
pub use transport_config::TransportConfig;
pub use transport_event::PeerEvent;

use crate::error::TransportError;
use crate::media::LocalTrack;
use async_trait::async_trait;
use peercast_core::{CandidateDescriptor, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;

/// The engine that owns the actual peer connection.
///
/// Descriptions and candidates are opaque to the coordinator and are passed
/// through unmodified.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, TransportError>;

    async fn create_answer(&self) -> Result<SessionDescription, TransportError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError>;

    async fn set_remote_description(&self, desc: SessionDescription)
    -> Result<(), TransportError>;

    async fn add_ice_candidate(&self, candidate: CandidateDescriptor)
    -> Result<(), TransportError>;

    async fn add_track(&self, track: LocalTrack) -> Result<(), TransportError>;

    async fn has_remote_description(&self) -> bool;

    async fn close(&self) -> Result<(), TransportError>;
}

/// Builds one [`PeerTransport`] per session; the engine reports its events on `events`.
#[async_trait]
pub trait PeerTransportFactory: Send + Sync {
    async fn create(
        &self,
        events: mpsc::Sender<PeerEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError>;
}
