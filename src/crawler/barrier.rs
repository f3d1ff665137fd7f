//! Counted join barrier
//!
//! Every spawned task holds a [`PendingGuard`]; the barrier releases once the
//! last guard is dropped. Children enter before their parent's guard drops,
//! so the count only reaches zero when the whole task tree has finished.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Pending-task counter with a completion signal
#[derive(Debug, Default)]
pub struct JoinBarrier {
    pending: AtomicUsize,
    notify: Notify,
}

impl JoinBarrier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one more pending task
    ///
    /// Call this before spawning the task; the task releases its slot by
    /// dropping the returned guard, including when it panics.
    pub fn enter(self: &Arc<Self>) -> PendingGuard {
        self.pending.fetch_add(1, Ordering::AcqRel);
        PendingGuard {
            barrier: Arc::clone(self),
        }
    }

    /// Number of tasks that have entered but not yet finished
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Waits until no task is pending
    pub async fn wait(&self) {
        loop {
            // Register interest before checking, so a release between the
            // check and the await still wakes us.
            let notified = self.notify.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn leave(&self) {
        if self.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.notify.notify_waiters();
        }
    }
}

/// Slot held by one pending task
#[derive(Debug)]
pub struct PendingGuard {
    barrier: Arc<JoinBarrier>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.barrier.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_without_tasks_returns_immediately() {
        let barrier = JoinBarrier::new();
        barrier.wait().await;
        assert_eq!(barrier.pending(), 0);
    }

    #[tokio::test]
    async fn test_guards_count_up_and_down() {
        let barrier = JoinBarrier::new();
        let first = barrier.enter();
        let second = barrier.enter();
        assert_eq!(barrier.pending(), 2);

        drop(first);
        assert_eq!(barrier.pending(), 1);
        drop(second);
        assert_eq!(barrier.pending(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_wait_releases_after_nested_tasks() {
        let barrier = JoinBarrier::new();
        let finished = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let guard = barrier.enter();
            let barrier = Arc::clone(&barrier);
            let finished = Arc::clone(&finished);
            tokio::spawn(async move {
                let _guard = guard;
                // Nested spawn enters before the parent's guard is released
                let child_guard = barrier.enter();
                let child_finished = Arc::clone(&finished);
                tokio::spawn(async move {
                    let _guard = child_guard;
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    child_finished.fetch_add(1, Ordering::SeqCst);
                });
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }

        barrier.wait().await;
        assert_eq!(finished.load(Ordering::SeqCst), 16);
        assert_eq!(barrier.pending(), 0);
    }

    #[tokio::test]
    async fn test_panicking_task_still_releases() {
        let barrier = JoinBarrier::new();
        let guard = barrier.enter();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("task failed");
        });

        assert!(handle.await.is_err());
        barrier.wait().await;
        assert_eq!(barrier.pending(), 0);
    }
}
