//! Optimistic mutation engine

mod engine;
mod snapshot;

pub use engine::OptimisticEngine;
pub(crate) use snapshot::{CommentSnapshot, PostSnapshot};
