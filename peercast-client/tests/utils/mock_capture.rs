use async_trait::async_trait;
use peercast_client::{CaptureConstraints, LocalStream, LocalTrack, MediaCapture, MediaError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;
use webrtc::api::media_engine::MIME_TYPE_VP8;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[derive(Clone, Copy)]
enum Outcome {
    Stream,
    Denied,
}

/// Capture source that either yields one silent VP8 track or refuses.
#[derive(Clone)]
pub struct MockCapture {
    outcome: Outcome,
    delay: Option<Duration>,
    requests: Arc<AtomicUsize>,
    pumps: Arc<Mutex<Vec<AbortHandle>>>,
}

impl MockCapture {
    pub fn granted() -> Self {
        Self {
            outcome: Outcome::Stream,
            delay: None,
            requests: Arc::new(AtomicUsize::new(0)),
            pumps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn denied() -> Self {
        Self {
            outcome: Outcome::Denied,
            ..Self::granted()
        }
    }

    /// Resolves only after `delay`, like a user staring at a picker.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::granted()
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Feeder tasks of handed-out streams that are still running.
    pub fn pumps_running(&self) -> usize {
        self.pumps
            .lock()
            .unwrap()
            .iter()
            .filter(|p| !p.is_finished())
            .count()
    }
}

pub fn test_video_track() -> LocalTrack {
    Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            ..Default::default()
        },
        "video".to_owned(),
        "test-display".to_owned(),
    ))
}

#[async_trait]
impl MediaCapture for MockCapture {
    async fn acquire_display_stream(
        &self,
        _constraints: &CaptureConstraints,
    ) -> Result<LocalStream, MediaError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.outcome {
            Outcome::Stream => {
                let pump = tokio::spawn(std::future::pending::<()>()).abort_handle();
                self.pumps.lock().unwrap().push(pump.clone());
                Ok(LocalStream::new("test-display", vec![test_video_track()]).with_pump(pump))
            }
            Outcome::Denied => Err(MediaError::PermissionDenied(
                "user dismissed the picker".to_owned(),
            )),
        }
    }
}
