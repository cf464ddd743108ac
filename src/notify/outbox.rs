use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use super::{Notification, Notifier, NotifyError};

/// Messages kept by `OutboxNotifier::new`
pub const DEFAULT_OUTBOX_CAPACITY: usize = 100;

/// Transport that keeps the most recent messages in memory.
///
/// Used when no mail relay is configured; the outbox lets the
/// development frontend and the tests pick up issued links. Only the
/// recipient and subject are logged since bodies carry sign-in tokens.
#[derive(Debug)]
pub struct OutboxNotifier {
    sent: RwLock<VecDeque<Notification>>,
    capacity: usize,
}

impl Default for OutboxNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl OutboxNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_OUTBOX_CAPACITY)
    }

    /// Outbox holding at most `capacity` messages, dropping the oldest first
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sent: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Messages still held, oldest first
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.iter().cloned().collect()
    }

    /// Most recent message addressed to `recipient`
    pub async fn last_for(&self, recipient: &str) -> Option<Notification> {
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find(|n| n.recipient() == recipient)
            .cloned()
    }
}

#[async_trait]
impl Notifier for OutboxNotifier {
    #[instrument(skip(self, notification), fields(to = %notification.recipient()))]
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let mut sent = self.sent.write().await;
        while sent.len() >= self.capacity {
            if let Some(dropped) = sent.pop_front() {
                debug!(dropped_to = %dropped.recipient(), "Outbox full, dropping oldest message");
            }
        }
        sent.push_back(notification.clone());
        info!(subject = notification.subject(), "Notification stored in outbox");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "OutboxNotifier"
    }
}
