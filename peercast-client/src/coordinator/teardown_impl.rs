use std::sync::atomic::Ordering;

use crate::coordinator::{Coordinator, SessionState};

impl Coordinator {
    /// Closes the relay channel and the peer transport. Idempotent.
    pub async fn teardown(&mut self) {
        self.alive.store(false, Ordering::Release);
        if self.state == SessionState::Closed {
            return;
        }

        self.channel.close();
        self.pending.clear();
        self.remote_description = None;

        if let Some(peer) = self.peer.take() {
            if let Err(e) = peer.close().await {
                self.log
                    .warn(format!("Failed to close peer connection: {}", e));
            }
        }

        self.set_state(SessionState::Closed);
        self.log.info("Session closed");
    }
}
