use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use peercast_core::{MessageKind, Role, SessionDescription};
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};
use uuid::Uuid;

use crate::channel::{ChannelState, SignalingChannel};
use crate::config::{Collaborators, SessionConfig};
use crate::error::{ChannelError, SessionError, TransportError};
use crate::logger::SessionLog;
use crate::media::LocalStream;
use crate::transport::{PeerEvent, PeerTransport};

mod assign_role_impl;
mod handle;
mod handle_answer_impl;
mod handle_candidate_impl;
mod handle_peer_event_impl;
mod handle_remote_offer_impl;
mod handle_signal_impl;
mod pending;
mod start_broadcaster_impl;
mod state;
mod teardown_impl;

pub use handle::CoordinatorHandle;
pub use pending::PendingCandidates;
pub use state::{NegotiationPhase, SessionState};

use handle::Command;

/// Drives the offer/answer/candidate exchange for exactly one peer session.
///
/// Each inbound event is processed to completion before the next one. Use
/// [`Coordinator::spawn`] to run it as a task, or call the operations directly
/// and pump events with [`Coordinator::process_next_event`].
pub struct Coordinator {
    id: Uuid,
    config: SessionConfig,
    collaborators: Collaborators,
    log: SessionLog,

    /// Cleared by teardown, possibly from another task.
    alive: Arc<AtomicBool>,

    state: SessionState,
    state_tx: watch::Sender<SessionState>,

    role: Option<Role>,
    phase: Option<NegotiationPhase>,
    /// Increments on every offer sent or accepted.
    round: u64,

    /// Exists only after role assignment.
    peer: Option<Arc<dyn PeerTransport>>,
    channel: SignalingChannel,
    pending: PendingCandidates,
    remote_description: Option<SessionDescription>,
    /// The broadcaster's display stream, stopped when the session ends.
    local_stream: Option<LocalStream>,

    peer_tx: mpsc::Sender<PeerEvent>,
    peer_rx: mpsc::Receiver<PeerEvent>,
}

impl Coordinator {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        let id = Uuid::new_v4();
        let log = SessionLog::new(id);
        let channel = SignalingChannel::new(config.code.clone(), &config.relay_url, log.clone());
        let (state_tx, _) = watch::channel(SessionState::Idle);
        let (peer_tx, peer_rx) = mpsc::channel(256);

        Self {
            id,
            config,
            collaborators,
            log,
            alive: Arc::new(AtomicBool::new(true)),
            state: SessionState::Idle,
            state_tx,
            role: None,
            phase: None,
            round: 0,
            peer: None,
            channel,
            pending: PendingCandidates::default(),
            remote_description: None,
            local_stream: None,
            peer_tx,
            peer_rx,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn phase(&self) -> Option<NegotiationPhase> {
        self.phase
    }

    pub fn negotiation_round(&self) -> u64 {
        self.round
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending.len()
    }

    pub fn channel_state(&self) -> ChannelState {
        self.channel.state()
    }

    /// Moves the coordinator onto its own task.
    pub fn spawn(self) -> CoordinatorHandle {
        let (command_tx, command_rx) = mpsc::channel(32);
        let handle = CoordinatorHandle::new(
            self.id,
            command_tx,
            self.state_tx.subscribe(),
            self.alive.clone(),
            self.log.clone(),
        );
        tokio::spawn(self.run(command_rx));
        handle
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(session = %self.id, "Coordinator event loop started");

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!(session = %self.id, "Command channel closed. Tearing down session.");
                            self.teardown().await;
                        }
                    }
                }

                evt = self.channel.next_event() => self.on_channel_event(evt).await,

                Some(evt) = self.peer_rx.recv() => self.on_peer_event(evt).await,
            }

            if self.state == SessionState::Closed {
                break;
            }
        }

        info!(session = %self.id, "Coordinator event loop finished");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::AssignRole { role, reply } => {
                let _ = reply.send(self.assign_role(role).await);
            }
            Command::StartBroadcaster { reply } => {
                let _ = reply.send(self.start_as_broadcaster().await);
            }
            Command::StartViewer { reply } => {
                let _ = reply.send(self.start_as_viewer().await);
            }
            Command::Teardown { reply } => {
                self.teardown().await;
                let _ = reply.send(());
            }
        }
    }

    /// Handles the next channel or peer-transport event.
    ///
    /// Waits until one is available; wrap in a timeout when nothing may come.
    pub async fn process_next_event(&mut self) {
        tokio::select! {
            evt = self.channel.next_event() => self.on_channel_event(evt).await,
            Some(evt) = self.peer_rx.recv() => self.on_peer_event(evt).await,
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Rejects work once the session is torn down or failed.
    fn gate(&self) -> Result<(), SessionError> {
        if !self.is_alive() || self.state == SessionState::Closed {
            return Err(SessionError::TornDown);
        }
        if self.state == SessionState::Failed {
            return Err(SessionError::SessionFailed);
        }
        Ok(())
    }

    fn require_role(&self, required: Role) -> Result<(), SessionError> {
        match self.role {
            Some(role) if role == required => Ok(()),
            actual => Err(SessionError::WrongRole { required, actual }),
        }
    }

    fn peer(&self) -> Result<Arc<dyn PeerTransport>, SessionError> {
        self.peer
            .clone()
            .ok_or_else(|| SessionError::Protocol("no peer transport before role assignment".into()))
    }

    /// Awaits one engine step. Failures fail the session.
    async fn negotiate<T>(
        &mut self,
        step: impl Future<Output = Result<T, TransportError>>,
    ) -> Result<T, SessionError> {
        let result = step.await;
        if !self.is_alive() {
            return Err(SessionError::TornDown);
        }
        result.map_err(|e| self.fail_negotiation(e))
    }

    fn send(&mut self, kind: MessageKind, data: Option<Value>) -> Result<(), SessionError> {
        match self.channel.send(kind, data) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail_channel(e)),
        }
    }

    fn protocol_violation(&self, reason: impl Into<String>) -> SessionError {
        let reason = reason.into();
        self.log.warn(format!("Protocol violation: {}", reason));
        SessionError::Protocol(reason)
    }

    fn fail_negotiation(&mut self, e: TransportError) -> SessionError {
        self.log.error(format!("Negotiation failed: {}", e));
        self.set_state(SessionState::Failed);
        SessionError::Negotiation(e)
    }

    fn fail_channel(&mut self, e: ChannelError) -> SessionError {
        self.log.error(format!("Signaling failed: {}", e));
        self.set_state(SessionState::Failed);
        SessionError::Channel(e)
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state == next || self.state == SessionState::Closed {
            return;
        }
        if self.state == SessionState::Failed && next != SessionState::Closed {
            return;
        }

        debug!(session = %self.id, "State {} -> {}", self.state, next);
        if next.is_terminal() {
            self.stop_local_stream();
        }
        self.state = next;
        self.state_tx.send_replace(next);
    }

    fn stop_local_stream(&mut self) {
        if let Some(stream) = self.local_stream.take() {
            stream.stop();
            self.log.debug(format!("Stopped local stream {}", stream.id));
        }
    }

    /// Derives the state from role, channel and negotiation phase.
    fn settle(&mut self) {
        if self.state.is_terminal() {
            return;
        }

        let next = match (self.role, self.channel.state()) {
            (None, _) => SessionState::Idle,
            (Some(_), ChannelState::Idle) => SessionState::RoleAssigned,
            (Some(_), ChannelState::Connecting) => SessionState::ChannelConnecting,
            (Some(_), ChannelState::Failed) => SessionState::Failed,
            (Some(_), ChannelState::Open | ChannelState::Closed) => match self.phase {
                Some(NegotiationPhase::Stable) => SessionState::Connected,
                Some(phase) => SessionState::Negotiating(phase),
                None => SessionState::RoleAssigned,
            },
        };
        self.set_state(next);
    }
}
