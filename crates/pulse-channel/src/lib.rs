//! # pulse-channel
//!
//! Realtime channel client: one long-lived bidirectional connection per
//! session, room membership, and named-event dispatch. The channel is an
//! enhancement over REST-derived state, never a dependency of it - every
//! failure path here degrades to logging.

pub mod connection;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod rooms;

pub use connection::{ChannelClient, Connector, MessageSink, MessageStream, WsConnector};
pub use dispatch::{EventBus, Subscription};
pub use error::ChannelError;
pub use protocol::ChannelMessage;
pub use rooms::RoomTracker;
