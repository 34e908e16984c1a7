use crate::error::ChannelError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Frames coming up from the underlying relay connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayFrame {
    Text(String),
    Closed(Option<String>),
    Error(String),
}

/// An established relay connection: text frames out, [`RelayFrame`]s in.
///
/// Dropping `outbound` closes the connection.
pub struct RelayLink {
    pub outbound: mpsc::UnboundedSender<String>,
    pub inbound: mpsc::UnboundedReceiver<RelayFrame>,
}

#[async_trait]
pub trait RelayConnector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<RelayLink, ChannelError>;
}
