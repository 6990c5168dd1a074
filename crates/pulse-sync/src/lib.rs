//! # pulse-sync
//!
//! Synchronization engine keeping one client's view of posts, comments, and
//! reactions consistent with the server under concurrent mutation:
//! optimistic local toggles reconciled against REST confirmations, inbound
//! broadcasts merged by idempotent replacement, and render-ready projections
//! over the result.

pub mod notify;
pub mod optimistic;
pub mod project;
pub mod reconcile;
pub mod rest;
pub mod session;
pub mod store;

// Re-export commonly used types at crate root
pub use notify::{notice_channel, Notice, NoticeSender};
pub use optimistic::OptimisticEngine;
pub use project::{project_comment, project_post, CommentView, PostView};
pub use reconcile::Reconciler;
pub use rest::HttpReactionGateway;
pub use session::{PostSession, PulseClient};
pub use store::ViewState;
