mod role;
mod session;
mod signaling;

pub use role::Role;
pub use session::SessionCode;
pub use signaling::{
    CandidateDescriptor, IceServerConfig, MessageKind, SessionDescription, SignalMessage,
};
