use crate::channel::{RelayConnector, WsConnector};
use crate::media::{CaptureConstraints, MediaCapture, NoCapture};
use crate::presenter::Presenter;
use crate::transport::{PeerTransportFactory, TransportConfig, WebRtcTransportFactory};
use peercast_core::SessionCode;
use peercast_core::utils::DEFAULT_RELAY_URL;
use std::sync::Arc;

/// Settings for one session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Relay base URL, e.g. `ws://localhost:8000`.
    pub relay_url: String,
    pub code: SessionCode,
    pub constraints: CaptureConstraints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_owned(),
            code: SessionCode::default(),
            constraints: CaptureConstraints::default(),
        }
    }
}

/// Everything the coordinator talks to besides the relay protocol itself.
#[derive(Clone)]
pub struct Collaborators {
    pub connector: Arc<dyn RelayConnector>,
    pub transports: Arc<dyn PeerTransportFactory>,
    pub capture: Arc<dyn MediaCapture>,
    pub presenter: Arc<dyn Presenter>,
}

impl Collaborators {
    /// Tungstenite relay connection and webrtc-rs transports.
    pub fn native(
        transport: TransportConfig,
        capture: Arc<dyn MediaCapture>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            connector: Arc::new(WsConnector),
            transports: Arc::new(WebRtcTransportFactory::new(transport)),
            capture,
            presenter,
        }
    }

    /// Native collaborators for an endpoint that only views.
    pub fn viewer(transport: TransportConfig, presenter: Arc<dyn Presenter>) -> Self {
        Self::native(transport, Arc::new(NoCapture), presenter)
    }
}
