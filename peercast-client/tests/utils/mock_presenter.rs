use peercast_client::{LocalStream, Presenter, RemoteStream};
use std::sync::{Arc, Mutex};

/// Presenter that remembers what it was asked to show.
#[derive(Clone, Default)]
pub struct MockPresenter {
    local: Arc<Mutex<Vec<String>>>,
    remote: Arc<Mutex<Vec<RemoteStream>>>,
}

impl MockPresenter {
    pub fn local_streams(&self) -> Vec<String> {
        self.local.lock().unwrap().clone()
    }

    pub fn remote_streams(&self) -> Vec<RemoteStream> {
        self.remote.lock().unwrap().clone()
    }
}

impl Presenter for MockPresenter {
    fn show_local(&self, stream: &LocalStream) {
        self.local.lock().unwrap().push(stream.id.clone());
    }

    fn show_remote(&self, stream: RemoteStream) {
        self.remote.lock().unwrap().push(stream);
    }
}
