//! User-visible notices
//!
//! The engine never talks to rendering code directly; it pushes typed
//! notices into a channel and the embedding UI decides how to present them.

use tokio::sync::mpsc;

use pulse_common::AppError;

/// A notice the UI should surface to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The action needs a logged-in user
    LoginRequired,
    /// A mutation failed and was rolled back; the user may retry manually
    ActionFailed { message: String },
}

impl Notice {
    /// Map an action-boundary error to its notice
    #[must_use]
    pub fn from_error(err: &AppError) -> Self {
        if err.requires_login() {
            Self::LoginRequired
        } else {
            Self::ActionFailed {
                message: err.user_message(),
            }
        }
    }
}

/// Sending half of the notice stream
#[derive(Debug, Clone)]
pub struct NoticeSender(mpsc::UnboundedSender<Notice>);

impl NoticeSender {
    /// Push a notice; a dropped receiver only means nobody is listening
    pub fn send(&self, notice: Notice) {
        if self.0.send(notice).is_err() {
            tracing::trace!("Notice receiver dropped");
        }
    }
}

/// Create the notice stream
#[must_use]
pub fn notice_channel() -> (NoticeSender, mpsc::UnboundedReceiver<Notice>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (NoticeSender(tx), rx)
}
