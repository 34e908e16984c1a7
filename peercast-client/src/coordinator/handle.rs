use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use peercast_core::Role;
use tokio::sync::{mpsc, oneshot, watch};
use uuid::Uuid;

use crate::coordinator::SessionState;
use crate::error::SessionError;
use crate::logger::SessionLog;

type Reply = oneshot::Sender<Result<(), SessionError>>;

pub(super) enum Command {
    AssignRole { role: Role, reply: Reply },
    StartBroadcaster { reply: Reply },
    StartViewer { reply: Reply },
    Teardown { reply: oneshot::Sender<()> },
}

/// Cloneable front end of a spawned [`Coordinator`](crate::Coordinator).
#[derive(Clone)]
pub struct CoordinatorHandle {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<SessionState>,
    alive: Arc<AtomicBool>,
    log: SessionLog,
}

impl CoordinatorHandle {
    pub(super) fn new(
        id: Uuid,
        commands: mpsc::Sender<Command>,
        state: watch::Receiver<SessionState>,
        alive: Arc<AtomicBool>,
        log: SessionLog,
    ) -> Self {
        Self {
            id,
            commands,
            state,
            alive,
            log,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Waits until the state satisfies `pred` and returns it.
    ///
    /// Returns the last known state if the coordinator stops first.
    pub async fn wait_for_state(&self, pred: impl Fn(SessionState) -> bool) -> SessionState {
        let mut rx = self.state.clone();
        let reached = rx.wait_for(|s| pred(*s)).await.map(|s| *s);
        reached.unwrap_or_else(|_| *rx.borrow())
    }

    async fn request(&self, make: impl FnOnce(Reply) -> Command) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| SessionError::TornDown)?;
        rx.await.map_err(|_| SessionError::TornDown)?
    }

    pub async fn assign_role(&self, role: Role) -> Result<(), SessionError> {
        self.request(|reply| Command::AssignRole { role, reply })
            .await
    }

    pub async fn start_as_broadcaster(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::StartBroadcaster { reply })
            .await
    }

    pub async fn start_as_viewer(&self) -> Result<(), SessionError> {
        self.request(|reply| Command::StartViewer { reply }).await
    }

    /// The "become broadcaster" entry action.
    pub async fn become_broadcaster(&self) -> Result<(), SessionError> {
        self.assign_role(Role::Broadcaster).await?;
        self.start_as_broadcaster().await
    }

    /// The "become viewer" entry action.
    pub async fn become_viewer(&self) -> Result<(), SessionError> {
        self.assign_role(Role::Viewer).await?;
        self.start_as_viewer().await
    }

    /// Tears the session down. Safe to call any number of times.
    ///
    /// In-flight operations observe the teardown as soon as their current
    /// engine call returns.
    pub async fn teardown(&self) {
        self.alive.store(false, Ordering::Release);

        let (reply, rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Teardown { reply })
            .await
            .is_ok()
        {
            let _ = rx.await;
        }
    }
}
