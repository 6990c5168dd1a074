//! Inbound event dispatch

mod bus;

pub use bus::{EventBus, Subscription};
