//! Channel connection
//!
//! One explicitly-owned connection object per client session, injected where
//! it is needed - never a module-level mutable singleton.

mod client;
mod connector;

pub use client::ChannelClient;
pub use connector::{Connector, MessageSink, MessageStream, WsConnector};
