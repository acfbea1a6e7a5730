//! Lock-guarded estimator handle.

use std::sync::{Arc, RwLock};

use crate::{
    config::EstimatorConfig, estimator::EstimatorState, estimator::LayoutCapacityEstimator,
    facts::FunctionFacts, observation::FunctionObservation, Result,
};

/// A cloneable handle to one [`LayoutCapacityEstimator`] behind an `RwLock`.
///
/// Meant for a single producer feeding observations while other threads read snapshots, e.g. a
/// progress reporter. Each snapshot is a copy taken under the read lock, so it is consistent
/// with respect to concurrent observations.
///
/// # Examples
///
/// ```rust
/// use slotscope::{BlockObservation, EstimatorConfig, FunctionObservation, SharedEstimator};
///
/// let shared = SharedEstimator::new(EstimatorConfig::new(1024)?);
/// let reader = shared.clone();
///
/// std::thread::spawn(move || {
///     shared
///         .observe_function(&FunctionObservation::new(vec![BlockObservation::new(false, vec![4])]))
/// })
/// .join()
/// .unwrap()?;
///
/// assert_eq!(reader.snapshot()?.code_size_bytes(), 4);
/// # Ok::<(), slotscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedEstimator {
    inner: Arc<RwLock<LayoutCapacityEstimator>>,
}

impl SharedEstimator {
    /// Wraps a fresh estimator.
    #[must_use]
    pub fn new(config: EstimatorConfig) -> Self {
        SharedEstimator {
            inner: Arc::new(RwLock::new(LayoutCapacityEstimator::new(config))),
        }
    }

    /// Adds one function under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the lock is poisoned, or
    /// [`crate::Error::InvalidObservation`] if the observation is rejected.
    pub fn observe_function(&self, observation: &FunctionObservation) -> Result<()> {
        write_lock!(self.inner)?.observe_function(observation)
    }

    /// Adds the function described by a facts provider under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the lock is poisoned, or
    /// [`crate::Error::InvalidObservation`] if the observation is rejected.
    pub fn observe<F: FunctionFacts + ?Sized>(&self, facts: &F) -> Result<()> {
        write_lock!(self.inner)?.observe(facts)
    }

    /// Copies the current state under the read lock.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the lock is poisoned.
    pub fn snapshot(&self) -> Result<EstimatorState> {
        Ok(read_lock!(self.inner)?.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::observation::BlockObservation;

    #[test]
    fn test_single_writer_many_readers() {
        let shared = SharedEstimator::new(EstimatorConfig::new(4096).unwrap());
        let writer = shared.clone();

        let producer = thread::spawn(move || {
            for _ in 0..100 {
                writer
                    .observe_function(&FunctionObservation::new(vec![
                        BlockObservation::new(true, vec![2, 2]),
                        BlockObservation::new(false, vec![4]),
                    ]))
                    .unwrap();
            }
        });

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let reader = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let state = reader.snapshot().unwrap();
                        // Every function adds exactly two blocks and eight bytes, so a
                        // consistent snapshot never sees a partial function.
                        assert_eq!(state.block_count(), state.function_count() * 2);
                        assert_eq!(state.code_size_bytes(), state.function_count() * 8);
                    }
                })
            })
            .collect();

        producer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        let state = shared.snapshot().unwrap();
        assert_eq!(state.function_count(), 100);
        assert_eq!(state.fall_through_count(), 100);
        assert_eq!(state.code_size_bytes(), 800);
    }
}
