use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::ProgressEvent;

/// Envelope wrapping a progress event with metadata.
#[derive(Debug, Clone)]
pub struct ProgressEnvelope {
    pub timestamp: DateTime<Utc>,
    pub event: ProgressEvent,
}

/// Handle for emitting progress events.
///
/// Cheaply cloneable and shareable across tasks. Events are sent through an
/// async channel to whatever sink the caller wired up (log window, file,
/// test collector). Emitting never fails the caller: if the channel is full
/// or closed the event is dropped and the error logged.
#[derive(Clone)]
pub struct ProgressHandle {
    tx: mpsc::Sender<ProgressEnvelope>,
}

impl ProgressHandle {
    /// Create a handle from a channel sender.
    pub fn new(tx: mpsc::Sender<ProgressEnvelope>) -> Self {
        Self { tx }
    }

    /// Create a handle together with its receiver.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ProgressEnvelope>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Emit a progress event asynchronously.
    pub async fn emit(&self, event: ProgressEvent) {
        let envelope = ProgressEnvelope {
            timestamp: Utc::now(),
            event,
        };
        if let Err(e) = self.tx.send(envelope).await {
            tracing::error!("Failed to emit progress event: {}", e);
        }
    }

    /// Try to emit a progress event without blocking.
    ///
    /// Returns true if the event was sent successfully.
    pub fn try_emit(&self, event: ProgressEvent) -> bool {
        let envelope = ProgressEnvelope {
            timestamp: Utc::now(),
            event,
        };
        match self.tx.try_send(envelope) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to emit progress event: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_event() {
        let (handle, mut rx) = ProgressHandle::channel(10);

        handle.emit(ProgressEvent::CheckoutReached).await;

        let envelope = rx.recv().await.expect("Should receive event");
        assert!(matches!(envelope.event, ProgressEvent::CheckoutReached));
    }

    #[tokio::test]
    async fn test_events_keep_order() {
        let (handle, mut rx) = ProgressHandle::channel(10);

        handle
            .emit(ProgressEvent::SearchExecuted {
                keyword: "Gold".to_string(),
            })
            .await;
        handle
            .emit(ProgressEvent::SearchExecuted {
                keyword: "Silver".to_string(),
            })
            .await;

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(
            matches!(first.event, ProgressEvent::SearchExecuted { keyword } if keyword == "Gold")
        );
        assert!(
            matches!(second.event, ProgressEvent::SearchExecuted { keyword } if keyword == "Silver")
        );
    }

    #[tokio::test]
    async fn test_emit_closed_channel_does_not_panic() {
        let (handle, rx) = ProgressHandle::channel(10);
        drop(rx);

        handle.emit(ProgressEvent::LoggedIn).await;
    }

    #[test]
    fn test_try_emit_full_channel() {
        let (handle, _rx) = ProgressHandle::channel(1);

        assert!(handle.try_emit(ProgressEvent::LoggedIn));
        assert!(!handle.try_emit(ProgressEvent::LoginSkipped));
    }

    #[test]
    fn test_envelope_has_timestamp() {
        let (handle, mut rx) = ProgressHandle::channel(10);

        let before = Utc::now();
        handle.try_emit(ProgressEvent::LoggedIn);
        let after = Utc::now();

        let envelope = rx.try_recv().expect("Should receive event");
        assert!(envelope.timestamp >= before);
        assert!(envelope.timestamp <= after);
    }
}
