use crate::error::MediaError;
use crate::media::{CaptureConstraints, LocalStream, LocalTrack, MediaCapture};
use async_trait::async_trait;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use webrtc::api::media_engine::MIME_TYPE_VP8;
use webrtc::media::Sample;
use webrtc::media::io::ivf_reader::IVFReader;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

const STREAM_ID: &str = "peercast-display";
const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(33);

/// Plays a VP8 IVF recording as the broadcaster's display track.
pub struct IvfFileCapture {
    path: PathBuf,
}

/// How long each frame stays on screen, from the gap to the next timestamp.
///
/// The last frame repeats the previous gap. Gaps that are zero, backwards or
/// not representable fall back to [`DEFAULT_FRAME_DURATION`].
fn frame_durations(timestamps: &[u64], numerator: u32, denominator: u32) -> Vec<Duration> {
    let seconds_per_tick = if numerator == 0 || denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    };

    let mut durations = Vec::with_capacity(timestamps.len());
    let mut previous = DEFAULT_FRAME_DURATION;
    for (i, ts) in timestamps.iter().enumerate() {
        let gap = timestamps
            .get(i + 1)
            .and_then(|next| next.checked_sub(*ts))
            .filter(|ticks| *ticks > 0)
            .zip(seconds_per_tick)
            .and_then(|(ticks, tick)| Duration::try_from_secs_f64(ticks as f64 * tick).ok())
            .filter(|d| !d.is_zero());
        let duration = match gap {
            Some(d) => d,
            None if i + 1 == timestamps.len() => previous,
            None => DEFAULT_FRAME_DURATION,
        };
        previous = duration;
        durations.push(duration);
    }
    durations
}

fn spawn_pump(track: Arc<TrackLocalStaticSample>, samples: Vec<Sample>) -> JoinHandle<()> {
    tokio::spawn(async move {
        for sample in samples {
            if let Err(e) = track.write_sample(&sample).await {
                warn!("Failed to write display frame: {}", e);
                return;
            }
            tokio::time::sleep(sample.duration).await;
        }
        info!("Display source finished");
    })
}

/// A recording loaded into memory, one sample per frame.
struct Recording {
    width: u16,
    height: u16,
    samples: Vec<Sample>,
}

impl IvfFileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Vec<u8>, MediaError> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            let reason = format!("{}: {}", self.path.display(), e);
            match e.kind() {
                ErrorKind::PermissionDenied => MediaError::PermissionDenied(reason),
                _ => MediaError::NotAvailable(reason),
            }
        })
    }

    async fn load(&self) -> Result<Recording, MediaError> {
        let data = self.read().await?;
        let (mut reader, header) = IVFReader::new(Cursor::new(data))
            .map_err(|e| MediaError::NotAvailable(format!("invalid IVF file: {}", e)))?;

        if &header.four_cc != b"VP80" {
            return Err(MediaError::NotAvailable(format!(
                "unsupported codec {:?}, only VP8 recordings can be shared",
                String::from_utf8_lossy(&header.four_cc)
            )));
        }

        let mut frames = Vec::new();
        let mut timestamps = Vec::new();
        while let Ok((frame, frame_header)) = reader.parse_next_frame() {
            frames.push(frame);
            timestamps.push(frame_header.timestamp);
        }
        if frames.is_empty() {
            return Err(MediaError::NotAvailable(format!(
                "{} contains no frames",
                self.path.display()
            )));
        }

        let durations = frame_durations(
            &timestamps,
            header.timebase_numerator,
            header.timebase_denominator,
        );
        let samples = frames
            .into_iter()
            .zip(durations)
            .map(|(frame, duration)| Sample {
                data: frame.freeze(),
                duration,
                ..Default::default()
            })
            .collect();

        Ok(Recording {
            width: header.width,
            height: header.height,
            samples,
        })
    }
}

fn display_track() -> Arc<TrackLocalStaticSample> {
    Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            ..Default::default()
        },
        "video".to_owned(),
        STREAM_ID.to_owned(),
    ))
}

#[async_trait]
impl MediaCapture for IvfFileCapture {
    async fn acquire_display_stream(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<LocalStream, MediaError> {
        if !constraints.video {
            return Err(MediaError::NotAvailable(
                "video capture disabled by constraints".to_owned(),
            ));
        }

        let recording = self.load().await?;
        info!(
            "Sharing {} ({}x{}, {} frame(s))",
            self.path.display(),
            recording.width,
            recording.height,
            recording.samples.len()
        );

        let video = display_track();
        let pump = spawn_pump(video.clone(), recording.samples);

        if constraints.audio {
            debug!("Audio requested but IVF recordings carry video only");
        }

        Ok(LocalStream::new(STREAM_ID, vec![video as LocalTrack]).with_pump(pump.abort_handle()))
    }
}
