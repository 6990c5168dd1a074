//! Shared harness for integration tests

mod fixtures;
mod hub;

pub use fixtures::{comment, post, wait_until, ScriptedGateway};
pub use hub::FakeHub;
