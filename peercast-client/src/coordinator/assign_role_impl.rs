use peercast_core::Role;

use crate::coordinator::{Coordinator, NegotiationPhase, SessionState};
use crate::error::SessionError;

impl Coordinator {
    /// Fixes this endpoint's role for the rest of the session.
    ///
    /// Assigning the same role again is a no-op; a different role fails with
    /// [`SessionError::RoleConflict`] and changes nothing. On first assignment
    /// the peer transport is created and the relay connection opened.
    pub async fn assign_role(&mut self, role: Role) -> Result<(), SessionError> {
        if let Some(current) = self.role {
            if current == role {
                return Ok(());
            }
            self.log.warn(format!(
                "Role already assigned as {}, refusing {}",
                current, role
            ));
            return Err(SessionError::RoleConflict {
                current,
                requested: role,
            });
        }
        self.gate()?;

        self.log.info(format!("Starting app as {}", role));

        let transports = self.collaborators.transports.clone();
        let peer = self.negotiate(transports.create(self.peer_tx.clone())).await?;

        self.peer = Some(peer);
        self.role = Some(role);
        self.phase = Some(if role.is_initiator() {
            NegotiationPhase::Preparing
        } else {
            NegotiationPhase::AwaitingOffer
        });
        self.set_state(SessionState::RoleAssigned);

        self.channel
            .connect(role, self.collaborators.connector.clone());
        self.settle();
        Ok(())
    }
}
