//! Debounced strength evaluation for as-you-type feedback.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::strength::{PasswordScorer, PasswordStrengthResult};

/// Quiet period before a pushed password is scored.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Scores only the last password pushed within the quiet period.
///
/// Every [`push`](Self::push) cancels the evaluation still waiting from the
/// previous one. Results are delivered on the channel given to [`new`](Self::new).
/// Dropping the debouncer cancels whatever is pending.
#[derive(Debug)]
pub struct StrengthDebouncer {
    scorer: Arc<PasswordScorer>,
    delay: Duration,
    tx: mpsc::Sender<PasswordStrengthResult>,
    pending: Option<CancellationToken>,
}

impl StrengthDebouncer {
    pub fn new(scorer: PasswordScorer, tx: mpsc::Sender<PasswordStrengthResult>) -> Self {
        Self {
            scorer: Arc::new(scorer),
            delay: DEFAULT_DEBOUNCE,
            tx,
            pending: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Schedules `password` for scoring, replacing any pending evaluation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(&mut self, password: SecretString) -> JoinHandle<()> {
        self.cancel();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let scorer = Arc::clone(&self.scorer);
        let tx = self.tx.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            if token
                .run_until_cancelled(tokio::time::sleep(delay))
                .await
                .is_none()
            {
                #[cfg(feature = "tracing")]
                tracing::trace!("superseded password evaluation cancelled");
                return;
            }

            let evaluation = scorer.score(&password);
            if token.is_cancelled() {
                return;
            }

            if let Err(_e) = tx.send(evaluation).await {
                #[cfg(feature = "tracing")]
                tracing::error!("Failed to send password evaluation result: {}", _e);
            }
        })
    }

    /// Cancels the pending evaluation, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for StrengthDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_push_is_scored() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut debouncer = StrengthDebouncer::new(PasswordScorer::new(), tx);

        debouncer.push(secret("a"));
        debouncer.push(secret("Ab"));
        let last = debouncer.push(secret("Abc123!@"));
        last.await.expect("evaluation task panicked");

        let evaluation = rx.recv().await.expect("Should receive evaluation");
        assert_eq!(evaluation.score, 5);

        drop(debouncer);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_waits_for_quiet_period() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut debouncer = StrengthDebouncer::new(PasswordScorer::new(), tx);
        let start = tokio::time::Instant::now();

        debouncer.push(secret("abcdefgh"));
        let evaluation = rx.recv().await.expect("Should receive evaluation");

        assert!(start.elapsed() >= DEFAULT_DEBOUNCE);
        assert_eq!(evaluation.score, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pushes_spaced_beyond_window_all_deliver() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut debouncer =
            StrengthDebouncer::new(PasswordScorer::new(), tx).with_delay(Duration::from_millis(50));

        debouncer.push(secret("short"));
        let first = rx.recv().await.expect("first evaluation");
        debouncer.push(secret("Abc123!@"));
        let second = rx.recv().await.expect("second evaluation");

        assert!(!first.is_valid);
        assert!(second.is_valid);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_evaluation() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut debouncer = StrengthDebouncer::new(PasswordScorer::new(), tx);

        let handle = debouncer.push(secret("Abc123!@"));
        debouncer.cancel();
        handle.await.expect("evaluation task panicked");

        drop(debouncer);
        assert!(rx.recv().await.is_none());
    }
}
