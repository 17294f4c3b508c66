use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::args::PositiveUsize;
use crate::error::AdmissionError;

/// Fixed-capacity permit pool bounding the number of in-flight request cycles.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionController {
    #[must_use]
    pub fn new(capacity: PositiveUsize) -> Self {
        let max = usize::try_from(u32::MAX)
            .unwrap_or(usize::MAX)
            .min(Semaphore::MAX_PERMITS);
        let capacity = capacity.get().min(max);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits for a free permit.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Cancelled`] once [`Self::cancel`] has been called,
    /// including for callers already waiting.
    pub async fn acquire(&self) -> Result<Permit, AdmissionError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(Permit { _permit: permit })
    }

    /// Closes the pool. Outstanding permits stay valid; every pending and
    /// future `acquire` fails.
    pub fn cancel(&self) {
        self.semaphore.close();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.semaphore.is_closed()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    #[must_use]
    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }

    /// Resolves once every permit has been returned.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::Cancelled`] when the pool is closed.
    pub async fn wait_idle(&self) -> Result<(), AdmissionError> {
        let all = u32::try_from(self.capacity).unwrap_or(u32::MAX);
        let permits = self.semaphore.acquire_many(all).await?;
        drop(permits);
        Ok(())
    }
}

/// One admission token. Returned to the pool when dropped, whatever path the
/// holder takes.
#[derive(Debug)]
pub struct Permit {
    _permit: OwnedSemaphorePermit,
}
