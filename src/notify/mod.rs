// Outbound notifications (magic-link mail)
//
// Services talk to the `Notifier` trait only; the concrete transport and the
// retry policy are chosen when the application state is assembled.

pub use outbox::{OutboxNotifier, DEFAULT_OUTBOX_CAPACITY};
pub use retry::RetryingNotifier;

mod outbox;
mod retry;

use async_trait::async_trait;
use thiserror::Error;

/// A message addressed to a single user
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    MagicLink {
        to: String,
        name: String,
        link: String,
    },
}

impl Notification {
    pub fn recipient(&self) -> &str {
        match self {
            Notification::MagicLink { to, .. } => to,
        }
    }

    pub fn subject(&self) -> &'static str {
        match self {
            Notification::MagicLink { .. } => "Your playoff pool sign-in link",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::MagicLink { name, link, .. } => format!(
                "Hi {name},\n\nUse the link below to sign in to the playoff pool:\n\n{link}\n\nThe link can be used once and expires shortly."
            ),
        }
    }
}

/// Errors reported by a notification transport
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotifyError {
    #[error("Transient delivery failure: {0}")]
    Transient(String),

    #[error("Permanent delivery failure: {0}")]
    Permanent(String),
}

impl NotifyError {
    /// Whether delivery should be attempted again
    pub fn is_retryable(&self) -> bool {
        matches!(self, NotifyError::Transient(_))
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable transport name for logs
    fn name(&self) -> &'static str;
}
