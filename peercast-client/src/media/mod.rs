mod ivf_capture;

pub use ivf_capture::IvfFileCapture;

use crate::error::MediaError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::task::AbortHandle;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

pub type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

/// What the broadcaster asks the capture source for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

#[derive(Clone)]
pub struct LocalStream {
    pub id: String,
    pub tracks: Vec<LocalTrack>,
    /// Task feeding the tracks, if the source runs one.
    pump: Option<AbortHandle>,
}

impl LocalStream {
    pub fn new(id: impl Into<String>, tracks: Vec<LocalTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
            pump: None,
        }
    }

    pub fn with_pump(mut self, pump: AbortHandle) -> Self {
        self.pump = Some(pump);
        self
    }

    /// Stops the task feeding the tracks. Safe to call more than once.
    pub fn stop(&self) {
        if let Some(pump) = &self.pump {
            pump.abort();
        }
    }

    pub fn is_pumping(&self) -> bool {
        self.pump.as_ref().is_some_and(|p| !p.is_finished())
    }
}

impl fmt::Debug for LocalStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let track_ids: Vec<&str> = self.tracks.iter().map(|t| t.id()).collect();
        f.debug_struct("LocalStream")
            .field("id", &self.id)
            .field("tracks", &track_ids)
            .field("pumping", &self.is_pumping())
            .finish()
    }
}

/// Inbound media announced by the peer-transport engine.
#[derive(Clone)]
pub struct RemoteStream {
    pub stream_id: String,
    pub track_id: String,
    pub kind: String,
    /// `None` when the engine does not expose an RTP track handle.
    pub track: Option<Arc<TrackRemote>>,
}

impl fmt::Debug for RemoteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStream")
            .field("stream_id", &self.stream_id)
            .field("track_id", &self.track_id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Source of the broadcaster's display stream.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    async fn acquire_display_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<LocalStream, MediaError>;
}

/// Capture source for endpoints that never broadcast.
pub struct NoCapture;

#[async_trait]
impl MediaCapture for NoCapture {
    async fn acquire_display_stream(
        &self,
        _constraints: &CaptureConstraints,
    ) -> Result<LocalStream, MediaError> {
        Err(MediaError::NotAvailable(
            "no display source configured".to_owned(),
        ))
    }
}
