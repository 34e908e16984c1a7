mod connector;
mod ws_connector;

pub use connector::{RelayConnector, RelayFrame, RelayLink};
pub use ws_connector::WsConnector;

use crate::error::ChannelError;
use crate::logger::SessionLog;
use peercast_core::{MessageKind, Role, SessionCode, SignalMessage};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Connecting,
    Open,
    Closed,
    Failed,
}

/// Lifecycle and message events surfaced to the coordinator.
#[derive(Debug)]
pub enum ChannelEvent {
    /// Connection established, `join` sent and the outbound queue flushed.
    Open,
    Message(SignalMessage),
    Closed(Option<String>),
    Failed(ChannelError),
}

type PendingConnect = oneshot::Receiver<Result<RelayLink, ChannelError>>;

/// Ordered, role-scoped send/receive surface over one relay connection.
///
/// Messages sent before the connection is open are stamped immediately and
/// queued; they go out in order right after the `join` message. There is no
/// automatic reconnect.
pub struct SignalingChannel {
    code: SessionCode,
    url: String,
    role: Option<Role>,
    state: ChannelState,
    connecting: Option<PendingConnect>,
    outbound: Option<mpsc::UnboundedSender<String>>,
    inbound: Option<mpsc::UnboundedReceiver<RelayFrame>>,
    queue: VecDeque<SignalMessage>,
    log: SessionLog,
}

impl SignalingChannel {
    pub fn new(code: SessionCode, relay_base: &str, log: SessionLog) -> Self {
        let url = code.signal_url(relay_base);
        Self {
            code,
            url,
            role: None,
            state: ChannelState::Idle,
            connecting: None,
            outbound: None,
            inbound: None,
            queue: VecDeque::new(),
            log,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of messages waiting for the connection to open.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Starts opening the relay connection in the background.
    ///
    /// The outcome is reported by [`next_event`](Self::next_event). Calling
    /// this while connecting or open does nothing.
    pub fn connect(&mut self, role: Role, connector: Arc<dyn RelayConnector>) {
        if matches!(self.state, ChannelState::Connecting | ChannelState::Open) {
            return;
        }

        self.role = Some(role);
        self.state = ChannelState::Connecting;
        self.log.info(format!("[relay] Connecting to {}", self.url));

        let (tx, rx) = oneshot::channel();
        let url = self.url.clone();
        tokio::spawn(async move {
            let _ = tx.send(connector.connect(&url).await);
        });
        self.connecting = Some(rx);
    }

    /// Sends now when open, otherwise queues. Never blocks.
    pub fn send(&mut self, kind: MessageKind, data: Option<Value>) -> Result<(), ChannelError> {
        let msg = SignalMessage {
            kind,
            data,
            code: Some(self.code.as_str().to_owned()),
            role: self.role,
            message: None,
        };

        match self.state {
            ChannelState::Open => self.transmit(&msg),
            ChannelState::Idle | ChannelState::Connecting => {
                self.log
                    .debug(format!("[relay] Queued `{}` until connected", msg.kind));
                self.queue.push_back(msg);
                Ok(())
            }
            ChannelState::Closed | ChannelState::Failed => Err(ChannelError::Closed),
        }
    }

    /// Drains the outbound queue in order. Returns how many messages went out.
    pub fn flush(&mut self) -> Result<usize, ChannelError> {
        if !self.is_open() {
            return Ok(0);
        }

        let mut sent = 0;
        while let Some(msg) = self.queue.pop_front() {
            if let Err(e) = self.transmit(&msg) {
                self.queue.push_front(msg);
                return Err(e);
            }
            sent += 1;
        }
        Ok(sent)
    }

    fn transmit(&mut self, msg: &SignalMessage) -> Result<(), ChannelError> {
        let send_error = |reason: String| ChannelError::Send {
            kind: msg.kind.to_string(),
            reason,
        };

        let text = msg.encode().map_err(|e| send_error(e.to_string()))?;
        let Some(outbound) = &self.outbound else {
            return Err(send_error("no relay connection".to_owned()));
        };
        if outbound.send(text).is_err() {
            self.state = ChannelState::Failed;
            return Err(send_error("relay connection dropped".to_owned()));
        }
        Ok(())
    }

    /// Waits for the next channel event.
    ///
    /// Inbound frames that do not parse are logged and dropped. Pends forever
    /// while the channel is idle or closed. Cancel-safe.
    pub async fn next_event(&mut self) -> ChannelEvent {
        if let Some(pending) = self.connecting.as_mut() {
            let result = pending.await;
            self.connecting = None;
            return match result {
                Ok(Ok(link)) => self.open(link),
                Ok(Err(e)) => self.fail(e),
                Err(_) => {
                    let e = ChannelError::Connect {
                        url: self.url.clone(),
                        reason: "connection task aborted".to_owned(),
                    };
                    self.fail(e)
                }
            };
        }

        loop {
            let frame = match self.inbound.as_mut() {
                Some(inbound) => inbound.recv().await,
                None => return std::future::pending().await,
            };

            match frame {
                Some(RelayFrame::Text(text)) => match SignalMessage::decode(&text) {
                    Ok(msg) => return ChannelEvent::Message(msg),
                    Err(e) => self.log.warn(format!("[relay] Dropping frame: {}", e)),
                },
                Some(RelayFrame::Closed(reason)) => {
                    self.release(ChannelState::Closed);
                    self.log.info("[relay] Disconnected");
                    return ChannelEvent::Closed(reason);
                }
                Some(RelayFrame::Error(reason)) => {
                    let e = ChannelError::Send {
                        kind: "frame".to_owned(),
                        reason,
                    };
                    return self.fail(e);
                }
                None => {
                    self.release(ChannelState::Closed);
                    self.log.info("[relay] Disconnected");
                    return ChannelEvent::Closed(None);
                }
            }
        }
    }

    fn open(&mut self, link: RelayLink) -> ChannelEvent {
        self.outbound = Some(link.outbound);
        self.inbound = Some(link.inbound);
        self.state = ChannelState::Open;
        self.log.info("[relay] Connected");

        if let Some(role) = self.role {
            let join = SignalMessage::join(&self.code, role);
            if let Err(e) = self.transmit(&join) {
                return self.fail(e);
            }
        }

        match self.flush() {
            Ok(0) => ChannelEvent::Open,
            Ok(n) => {
                self.log
                    .debug(format!("[relay] Flushed {} queued message(s)", n));
                ChannelEvent::Open
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, e: ChannelError) -> ChannelEvent {
        self.release(ChannelState::Failed);
        self.log.error(format!("[relay] Error: {}", e));
        ChannelEvent::Failed(e)
    }

    fn release(&mut self, state: ChannelState) {
        self.connecting = None;
        self.outbound = None;
        self.inbound = None;
        self.state = state;
    }

    /// Closes the connection and drops anything still queued. Idempotent.
    pub fn close(&mut self) {
        if self.state == ChannelState::Closed {
            return;
        }
        self.release(ChannelState::Closed);
        self.queue.clear();
    }
}
