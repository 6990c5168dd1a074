//! Transport connector seam
//!
//! `ChannelClient` speaks `ChannelMessage` frames; how those frames move is
//! behind the `Connector` trait. Production uses the WebSocket connector,
//! tests plug in in-memory duplex pairs.

use async_trait::async_trait;
use futures::future;
use futures_util::{SinkExt, StreamExt};
use std::pin::Pin;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::error::ChannelError;
use crate::protocol::ChannelMessage;

/// Outbound half of an established connection
pub type MessageSink = Pin<Box<dyn futures::Sink<ChannelMessage, Error = ChannelError> + Send>>;

/// Inbound half of an established connection
pub type MessageStream =
    Pin<Box<dyn futures::Stream<Item = Result<ChannelMessage, ChannelError>> + Send>>;

/// Establishes one framed bidirectional connection
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect and perform the authentication handshake.
    ///
    /// `token` is whatever the token store held at call time; implementations
    /// must present it during the handshake, not at some earlier cached point.
    async fn connect(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<(MessageSink, MessageStream), ChannelError>;
}

/// WebSocket connector (tokio-tungstenite)
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    /// Create a new WebSocket connector
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<(MessageSink, MessageStream), ChannelError> {
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        let (sink, stream) = ws.split();

        let mut sink: MessageSink = Box::pin(
            sink.sink_map_err(|e: WsError| ChannelError::Transport(e.to_string()))
                .with(|msg: ChannelMessage| {
                    future::ready(msg.to_json().map(Message::Text).map_err(ChannelError::from))
                }),
        );

        // Handshake: the first frame carries the bearer token
        sink.send(ChannelMessage::auth(token))
            .await
            .map_err(|e| ChannelError::Handshake(e.to_string()))?;

        let stream: MessageStream = Box::pin(stream.filter_map(|item| {
            future::ready(match item {
                Ok(Message::Text(text)) => match ChannelMessage::from_json(&text) {
                    Ok(msg) => Some(Ok(msg)),
                    Err(err) => {
                        tracing::debug!(error = %err, "Ignoring malformed channel frame");
                        None
                    }
                },
                Ok(Message::Close(_)) => Some(Err(ChannelError::Closed)),
                // Ping/pong are handled by the transport; binary is not part
                // of this protocol
                Ok(_) => None,
                Err(err) => Some(Err(ChannelError::Transport(err.to_string()))),
            })
        }));

        Ok((sink, stream))
    }
}
