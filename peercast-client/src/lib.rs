//! Native signaling client for a one-to-one screen share.
//!
//! A [`Coordinator`] owns one session: it opens the relay connection through a
//! [`SignalingChannel`], drives the offer/answer/candidate exchange against a
//! [`PeerTransport`] and reports progress to a [`SessionLog`].

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logger;
pub mod media;
pub mod presenter;
pub mod transport;

pub use channel::{
    ChannelEvent, ChannelState, RelayConnector, RelayFrame, RelayLink, SignalingChannel,
    WsConnector,
};
pub use config::{Collaborators, SessionConfig};
pub use coordinator::{Coordinator, CoordinatorHandle, NegotiationPhase, SessionState};
pub use error::{ChannelError, MediaError, SessionError, TransportError};
pub use logger::{LogCursor, LogEntry, LogLevel, SessionLog};
pub use media::{
    CaptureConstraints, IvfFileCapture, LocalStream, LocalTrack, MediaCapture, NoCapture,
    RemoteStream,
};
pub use presenter::Presenter;
pub use transport::{
    PeerEvent, PeerTransport, PeerTransportFactory, TransportConfig, WebRtcTransport,
    WebRtcTransportFactory,
};
