//! Channel wire protocol
//!
//! All traffic is named events, never raw streams.

mod frame;

pub use frame::ChannelMessage;
