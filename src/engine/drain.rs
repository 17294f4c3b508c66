use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures_util::StreamExt;
use tokio::sync::Notify;
use tracing::debug;

use crate::http::BodyStream;

/// Tracks detached body drains so bounded runs can wait for connections to be
/// handed back before exiting.
#[derive(Debug, Clone, Default)]
pub struct DrainTracker {
    state: Arc<DrainState>,
}

#[derive(Debug, Default)]
struct DrainState {
    pending: AtomicUsize,
    completed: AtomicU64,
    bytes: AtomicU64,
    idle: Notify,
}

struct PendingDrain {
    state: Arc<DrainState>,
}

impl PendingDrain {
    fn register(state: &Arc<DrainState>) -> Self {
        state.pending.fetch_add(1, Ordering::AcqRel);
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for PendingDrain {
    fn drop(&mut self) {
        self.state.completed.fetch_add(1, Ordering::AcqRel);
        let previous = self.state.pending.fetch_sub(1, Ordering::AcqRel);
        if previous <= 1 {
            self.state.idle.notify_waiters();
        }
    }
}

impl DrainTracker {
    /// Reads `body` to the end on its own task. The caller does not wait.
    pub fn spawn(&self, url: String, mut body: BodyStream) -> tokio::task::JoinHandle<()> {
        let pending = PendingDrain::register(&self.state);
        tokio::spawn(async move {
            let mut total: u64 = 0;
            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => total = total.saturating_add(bytes),
                    Err(err) => {
                        debug!("Body drain for {} stopped early: {}", url, err);
                        break;
                    }
                }
            }
            drop(body);
            pending.state.bytes.fetch_add(total, Ordering::Relaxed);
            drop(pending);
        })
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.pending.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn completed(&self) -> u64 {
        self.state.completed.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn drained_bytes(&self) -> u64 {
        self.state.bytes.load(Ordering::Relaxed)
    }

    /// Resolves when no drain is outstanding.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.state.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}
