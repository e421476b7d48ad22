//! Debounced persistence of the open note.
//!
//! Every call to [`WriteCoalescer::schedule`] supersedes the previous one, so a
//! burst of edits ends in a single write carrying the payload of the last call.
//! The payload is converted when scheduling, not when the timer fires.

use std::{sync::Arc, time::Duration};

use tokio::{sync::oneshot, task::JoinHandle};

use crate::storage::NoteStorage;

#[derive(Debug)]
struct PendingWrite {
    path: String,
    cancel: oneshot::Sender<()>,
}

/// Owns at most one delayed write task.
///
/// Each task awaits the task it replaced before writing or returning, so
/// awaiting the latest task waits for every write started before it.
#[derive(Debug)]
pub struct WriteCoalescer {
    delay: Duration,
    storage: Arc<dyn NoteStorage>,
    pending: Option<PendingWrite>,
    last_task: Option<JoinHandle<()>>,
}

impl WriteCoalescer {
    pub fn new(storage: Arc<dyn NoteStorage>, delay: Duration) -> Self {
        Self {
            delay,
            storage,
            pending: None,
            last_task: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending write with a new one firing after the configured delay.
    ///
    /// `to_storage(content, path)` runs immediately. A failed write is logged and
    /// dropped; it is not retried.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime
    pub fn schedule<F>(&mut self, path: &str, content: &str, to_storage: F)
    where
        F: FnOnce(&str, &str) -> String,
    {
        self.cancel();

        let payload = to_storage(content, path);
        let (cancel, cancelled) = oneshot::channel::<()>();
        let storage = Arc::clone(&self.storage);
        let delay = self.delay;
        let target = path.to_string();
        let previous = self.last_task.take();

        let task = tokio::spawn(async move {
            let fire = tokio::select! {
                biased;
                _ = cancelled => false,
                () = tokio::time::sleep(delay) => true,
            };
            if let Some(previous) = previous
                && let Err(e) = previous.await
            {
                tracing::warn!(path = %target, error = %e, "previous write task aborted");
            }
            if !fire {
                tracing::trace!(path = %target, "scheduled write cancelled");
                return;
            }
            match storage.write(&target, &payload).await {
                Ok(()) => tracing::debug!(path = %target, "scheduled write completed"),
                Err(e) => tracing::error!(path = %target, error = %e, "scheduled write failed"),
            }
        });

        tracing::trace!(path, ?delay, "write scheduled");
        self.pending = Some(PendingWrite {
            path: path.to_string(),
            cancel,
        });
        self.last_task = Some(task);
    }

    /// Drop the pending write without persisting it. No-op when idle.
    ///
    /// A write whose timer already fired keeps running; the next
    /// [`schedule`](Self::schedule) or [`settle`](Self::settle) waits for it.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            // Err means the timer already fired.
            let _ = pending.cancel.send(());
        }
    }

    /// Cancel the pending write and wait for every write that already started.
    pub async fn settle(&mut self) {
        self.cancel();
        if let Some(task) = self.last_task.take()
            && let Err(e) = task.await
        {
            tracing::warn!(error = %e, "scheduled write task aborted");
        }
    }

    /// Whether the latest scheduled write is waiting or running
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending_path().is_some()
    }

    /// Path of the pending write, if any
    #[must_use]
    pub fn pending_path(&self) -> Option<&str> {
        let running = self.last_task.as_ref().is_some_and(|task| !task.is_finished());
        self.pending
            .as_ref()
            .filter(|_| running)
            .map(|pending| pending.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::storage::testing::RecordingStorage;

    const DELAY: Duration = Duration::from_millis(500);

    fn tagged(content: &str, path: &str) -> String {
        format!("{path}:{content}")
    }

    fn coalescer() -> (Arc<RecordingStorage>, WriteCoalescer) {
        let storage = Arc::new(RecordingStorage::new());
        let coalescer = WriteCoalescer::new(storage.clone(), DELAY);
        (storage, coalescer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_schedules_writes_last_payload_once() {
        let (storage, mut coalescer) = coalescer();

        for version in 1..=5 {
            coalescer.schedule("/n1", &format!("v{version}"), tagged);
            tokio::time::sleep(DELAY / 2).await;
        }
        assert!(storage.writes().is_empty());

        tokio::time::sleep(DELAY * 4).await;
        assert_eq!(storage.writes(), vec![("/n1".into(), "/n1:v5".into())]);
        assert!(!coalescer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_schedules_in_window_write_once() {
        let (storage, mut coalescer) = coalescer();

        coalescer.schedule("/n1", "v1", tagged);
        coalescer.schedule("/n1", "v2", tagged);
        tokio::time::sleep(DELAY * 2).await;

        assert_eq!(storage.writes(), vec![("/n1".into(), "/n1:v2".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_payload_computed_at_schedule_time() {
        let (storage, mut coalescer) = coalescer();
        let conversions = AtomicUsize::new(0);

        coalescer.schedule("/n1", "v1", |content, path| {
            conversions.fetch_add(1, Ordering::SeqCst);
            tagged(content, path)
        });
        assert_eq!(conversions.load(Ordering::SeqCst), 1);
        assert_eq!(coalescer.pending_path(), Some("/n1"));

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(conversions.load(Ordering::SeqCst), 1);
        assert_eq!(storage.writes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_write() {
        let (storage, mut coalescer) = coalescer();

        coalescer.schedule("/n1", "v1", tagged);
        assert!(coalescer.is_pending());
        coalescer.cancel();
        assert!(!coalescer.is_pending());

        tokio::time::sleep(DELAY * 2).await;
        assert!(storage.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_and_settle_when_idle() {
        let (storage, mut coalescer) = coalescer();
        coalescer.cancel();
        coalescer.settle().await;
        assert!(!coalescer.is_pending());
        assert!(storage.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_cancels_sleeping_write() {
        let (storage, mut coalescer) = coalescer();

        coalescer.schedule("/n1", "v1", tagged);
        coalescer.settle().await;

        tokio::time::sleep(DELAY * 2).await;
        assert!(storage.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_write_is_not_retried() {
        let (storage, mut coalescer) = coalescer();
        storage.set_fail_writes(true);

        coalescer.schedule("/n1", "v1", tagged);
        tokio::time::sleep(DELAY * 10).await;

        assert_eq!(storage.writes().len(), 1);
        assert!(!coalescer.is_pending());
        assert_eq!(storage.stored("/n1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_path_supersedes_old_path() {
        let (storage, mut coalescer) = coalescer();

        coalescer.schedule("/n1", "a", tagged);
        coalescer.schedule("/n2", "b", tagged);
        tokio::time::sleep(DELAY * 2).await;

        assert_eq!(storage.writes(), vec![("/n2".into(), "/n2:b".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_write_lands_before_its_successor() {
        let (storage, mut coalescer) = coalescer();
        storage.slow_next_write(DELAY * 4);

        coalescer.schedule("/n1", "v1", tagged);
        tokio::time::sleep(DELAY + DELAY / 5).await;
        assert_eq!(storage.writes().len(), 1);

        coalescer.schedule("/n1", "v2", tagged);
        tokio::time::sleep(DELAY * 10).await;

        assert_eq!(
            storage.writes(),
            vec![
                ("/n1".into(), "/n1:v1".into()),
                ("/n1".into(), "/n1:v2".into()),
            ]
        );
        assert_eq!(storage.stored("/n1").as_deref(), Some("/n1:v2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_write_running_after_cancel() {
        let (storage, mut coalescer) = coalescer();
        storage.slow_next_write(DELAY * 4);

        coalescer.schedule("/n1", "v1", tagged);
        tokio::time::sleep(DELAY + DELAY / 5).await;
        coalescer.schedule("/n1", "v2", tagged);
        coalescer.cancel();
        assert_eq!(storage.stored("/n1"), None);

        coalescer.settle().await;
        assert_eq!(storage.stored("/n1").as_deref(), Some("/n1:v1"));
        assert_eq!(storage.writes().len(), 1);
    }
}
