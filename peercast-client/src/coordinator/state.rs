use std::fmt;

/// Where the offer/answer exchange currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationPhase {
    /// Viewer waiting for the broadcaster's offer.
    AwaitingOffer,
    /// Broadcaster before its offer went out.
    Preparing,
    /// Broadcaster waiting for the answer.
    OfferSent,
    /// Both descriptions applied for the current round.
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    RoleAssigned,
    ChannelConnecting,
    Negotiating(NegotiationPhase),
    Connected,
    /// Unrecoverable channel or negotiation error. Restart with a new session.
    Failed,
    /// Torn down.
    Closed,
}

impl SessionState {
    /// `Failed` and `Closed` are never left.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Failed | SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::RoleAssigned => f.write_str("role assigned"),
            SessionState::ChannelConnecting => f.write_str("connecting"),
            SessionState::Negotiating(phase) => write!(f, "negotiating ({:?})", phase),
            SessionState::Connected => f.write_str("connected"),
            SessionState::Failed => f.write_str("failed"),
            SessionState::Closed => f.write_str("closed"),
        }
    }
}
