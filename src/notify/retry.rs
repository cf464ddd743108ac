use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use super::{Notification, Notifier, NotifyError};

/// Decorator that retries a transport with linear backoff.
///
/// Attempt `n` (1-based) that fails with a retryable error is followed by a
/// sleep of `delay * n` before attempt `n + 1`.
pub struct RetryingNotifier {
    inner: Arc<dyn Notifier>,
    max_attempts: u32,
    delay: Duration,
}

impl RetryingNotifier {
    pub fn new(inner: Arc<dyn Notifier>, max_attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.delay * attempt
    }
}

#[async_trait]
impl Notifier for RetryingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let transport = self.inner.name();
        let to = notification.recipient();

        for attempt in 1..=self.max_attempts {
            match self.inner.send(notification).await {
                Ok(()) => {
                    if attempt > 1 {
                        info!(transport, to, attempt, "Notification sent after retry");
                    }
                    return Ok(());
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let wait = self.backoff(attempt);
                    warn!(
                        transport,
                        to,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %e,
                        "Notification failed, will retry"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    error!(transport, to, attempt, error = %e, "Notification failed permanently");
                    return Err(e);
                }
            }
        }

        // max_attempts >= 1, so the loop always returns
        Err(NotifyError::Permanent("no delivery attempts made".to_string()))
    }

    fn name(&self) -> &'static str {
        "RetryingNotifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls with the given error
    struct FlakyNotifier {
        failures: u32,
        error: NotifyError,
        calls: AtomicU32,
    }

    impl FlakyNotifier {
        fn new(failures: u32, error: NotifyError) -> Self {
            Self {
                failures,
                error,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Notifier for FlakyNotifier {
        async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(self.error.clone())
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &'static str {
            "FlakyNotifier"
        }
    }

    fn notification() -> Notification {
        Notification::MagicLink {
            to: "fan@example.com".to_string(),
            name: "Fan".to_string(),
            link: "http://localhost/auth/verify?token=t".to_string(),
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let flaky = Arc::new(FlakyNotifier::new(
            2,
            NotifyError::Transient("connection reset".into()),
        ));
        let notifier = RetryingNotifier::new(flaky.clone(), 3, Duration::from_millis(1));

        notifier.send(&notification()).await.unwrap();
        assert_eq!(flaky.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let flaky = Arc::new(FlakyNotifier::new(
            10,
            NotifyError::Transient("timeout".into()),
        ));
        let notifier = RetryingNotifier::new(flaky.clone(), 3, Duration::from_millis(1));

        let result = notifier.send(&notification()).await;
        assert!(matches!(result, Err(NotifyError::Transient(_))));
        assert_eq!(flaky.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let flaky = Arc::new(FlakyNotifier::new(
            1,
            NotifyError::Permanent("mailbox does not exist".into()),
        ));
        let notifier = RetryingNotifier::new(flaky.clone(), 5, Duration::from_millis(1));

        assert!(notifier.send(&notification()).await.is_err());
        assert_eq!(flaky.calls(), 1);
    }

    #[test]
    fn test_backoff_is_linear() {
        let flaky = Arc::new(FlakyNotifier::new(0, NotifyError::Transient(String::new())));
        let notifier = RetryingNotifier::new(flaky, 4, Duration::from_millis(250));

        assert_eq!(notifier.backoff(1), Duration::from_millis(250));
        assert_eq!(notifier.backoff(2), Duration::from_millis(500));
        assert_eq!(notifier.backoff(3), Duration::from_millis(750));
    }

    #[test]
    fn test_zero_attempts_is_clamped_to_one() {
        let flaky = Arc::new(FlakyNotifier::new(0, NotifyError::Transient(String::new())));
        let notifier = RetryingNotifier::new(flaky, 0, Duration::from_millis(1));
        assert_eq!(notifier.max_attempts, 1);
    }
}
