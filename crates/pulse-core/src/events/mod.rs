//! Realtime events - inbound broadcasts and outbound emissions

mod client_event;
mod server_event;

pub use client_event::ClientEvent;
pub use server_event::{
    CommentApprovedEvent, CommentDeletedEvent, CommentReactionEvent, CommentReportedEvent,
    CommentUpdatedEvent, PostLikedEvent, ServerEvent, UpdateKind,
};
