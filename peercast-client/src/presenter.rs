use crate::media::{LocalStream, RemoteStream};

/// Rendering side of a session: receives the media handles the coordinator
/// produces. Log lines are consumed separately through `SessionLog`.
pub trait Presenter: Send + Sync {
    fn show_local(&self, _stream: &LocalStream) {}

    fn show_remote(&self, stream: RemoteStream);
}
