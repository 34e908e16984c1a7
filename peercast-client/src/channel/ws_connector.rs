use crate::channel::{RelayConnector, RelayFrame, RelayLink};
use crate::error::ChannelError;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Relay connector over a WebSocket.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl RelayConnector for WsConnector {
    async fn connect(&self, url: &str) -> Result<RelayLink, ChannelError> {
        let (socket, _) = connect_async(url)
            .await
            .map_err(|e| ChannelError::Connect {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        info!("WebSocket connected: {}", url);

        let (mut sender, mut receiver) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        let err_tx = in_tx.clone();
        let mut send_task = tokio::spawn(async move {
            while let Some(text) = out_rx.recv().await {
                if let Err(e) = sender.send(Message::Text(text.into())).await {
                    let _ = err_tx.send(RelayFrame::Error(e.to_string()));
                    return;
                }
            }
            let _ = sender.close().await;
        });

        let mut recv_task = tokio::spawn(async move {
            while let Some(frame) = receiver.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if in_tx.send(RelayFrame::Text(text.to_string())).is_err() {
                            return;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        let reason = frame.map(|f| f.reason.to_string());
                        let _ = in_tx.send(RelayFrame::Closed(reason));
                        return;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket receive error: {}", e);
                        let _ = in_tx.send(RelayFrame::Error(e.to_string()));
                        return;
                    }
                }
            }
            let _ = in_tx.send(RelayFrame::Closed(None));
        });

        tokio::spawn(async move {
            tokio::select! {
                _ = (&mut send_task) => recv_task.abort(),
                _ = (&mut recv_task) => send_task.abort(),
            };
            debug!("WebSocket tasks finished");
        });

        Ok(RelayLink {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}
