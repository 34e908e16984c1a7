use crate::error::TransportError;
use crate::media::{LocalTrack, RemoteStream};
use crate::transport::{PeerEvent, PeerTransport, PeerTransportFactory, TransportConfig};
use async_trait::async_trait;
use peercast_core::{CandidateDescriptor, SessionDescription};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

/// Browser-shaped session description: `{"type": "...", "sdp": "..."}`.
#[derive(Deserialize)]
struct WireDescription {
    #[serde(rename = "type")]
    sdp_type: String,
    sdp: String,
}

fn from_wire(desc: SessionDescription) -> Result<RTCSessionDescription, TransportError> {
    let wire: WireDescription = serde_json::from_value(desc.0)?;
    let parsed = match wire.sdp_type.as_str() {
        "offer" => RTCSessionDescription::offer(wire.sdp)?,
        "answer" => RTCSessionDescription::answer(wire.sdp)?,
        "pranswer" => RTCSessionDescription::pranswer(wire.sdp)?,
        other => return Err(TransportError::UnsupportedDescription(other.to_owned())),
    };
    Ok(parsed)
}

fn to_wire(desc: &RTCSessionDescription) -> SessionDescription {
    SessionDescription(json!({
        "type": desc.sdp_type.to_string(),
        "sdp": desc.sdp,
    }))
}

/// [`PeerTransport`] backed by a webrtc-rs peer connection.
pub struct WebRtcTransport {
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcTransport {
    /// Builds the peer connection and wires its callbacks into `event_tx`.
    pub async fn new(
        config: TransportConfig,
        event_tx: mpsc::Sender<PeerEvent>,
    ) -> Result<Self, TransportError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .into_iter()
                .map(|server| RTCIceServer {
                    urls: server.urls,
                    username: server.username.unwrap_or_default(),
                    credential: server.credential.unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer connection state changed: {}", s);
                    let _ = tx.send(PeerEvent::ConnectionState(s)).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let Ok(value) = serde_json::to_value(&init) else {
                    return;
                };
                let _ = tx
                    .send(PeerEvent::LocalCandidate(CandidateDescriptor(value)))
                    .await;
            })
        }));

        let track_tx = event_tx;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    debug!(
                        "Remote track {} ({}) in stream {}",
                        track.id(),
                        track.kind(),
                        track.stream_id()
                    );
                    let stream = RemoteStream {
                        stream_id: track.stream_id().to_string(),
                        track_id: track.id().to_string(),
                        kind: track.kind().to_string(),
                        track: Some(track),
                    };
                    let _ = tx.send(PeerEvent::RemoteTrack(stream)).await;
                })
            },
        ));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl PeerTransport for WebRtcTransport {
    async fn create_offer(&self) -> Result<SessionDescription, TransportError> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(to_wire(&offer))
    }

    async fn create_answer(&self) -> Result<SessionDescription, TransportError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(to_wire(&answer))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), TransportError> {
        let desc = from_wire(desc)?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), TransportError> {
        let desc = from_wire(desc)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(
        &self,
        candidate: CandidateDescriptor,
    ) -> Result<(), TransportError> {
        let candidate: RTCIceCandidateInit = serde_json::from_value(candidate.0)?;
        self.peer_connection.add_ice_candidate(candidate).await?;
        Ok(())
    }

    async fn add_track(&self, track: LocalTrack) -> Result<(), TransportError> {
        let sender = self.peer_connection.add_track(track).await?;

        // RTCP has to be drained for interceptors (NACK, reports) to run.
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while let Ok((_, _)) = sender.read(&mut rtcp_buf).await {}
        });
        Ok(())
    }

    async fn has_remote_description(&self) -> bool {
        self.peer_connection.remote_description().await.is_some()
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Creates a fresh [`WebRtcTransport`] per session.
#[derive(Clone, Default)]
pub struct WebRtcTransportFactory {
    config: TransportConfig,
}

impl WebRtcTransportFactory {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PeerTransportFactory for WebRtcTransportFactory {
    async fn create(
        &self,
        events: mpsc::Sender<PeerEvent>,
    ) -> Result<Arc<dyn PeerTransport>, TransportError> {
        let transport = WebRtcTransport::new(self.config.clone(), events).await?;
        Ok(Arc::new(transport))
    }
}
