pub use peercast_core::{Role, SessionCode, SignalMessage};

pub mod model {
    pub use peercast_core::model::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use peercast_client::*;
}
