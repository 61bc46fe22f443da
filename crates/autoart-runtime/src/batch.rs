//! Bounded-concurrency batch execution.
//!
//! Indices `0..count` are split into groups of `batch_size`. Groups run one
//! after another; every index in a group runs concurrently on the blocking
//! thread pool. When a unit fails, the executor still waits for the rest of
//! its group, then returns the first error without starting further groups.
//! Output already produced by completed groups is left in place.

use autoart_core::BatchConfig;
use std::any::Any;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};

pub struct BatchExecutor {
    batch_size: u64,
}

impl BatchExecutor {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1) as u64,
        }
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Number of groups needed for `count` units
    pub fn num_batches(&self, count: u64) -> u64 {
        count.div_ceil(self.batch_size)
    }

    /// Run `task(n)` for every `n` in `0..count`.
    ///
    /// `on_start` is called before each group with the 1-based group number
    /// and the total number of groups. The first error reported by a unit is
    /// returned once its group has drained. A panicking unit is re-raised on
    /// the caller after the group drains, as is a unit cancelled by a runtime
    /// shutdown.
    #[instrument(skip(self, on_start, task), fields(batch_size = self.batch_size))]
    pub async fn run<T, E, P>(&self, count: u64, mut on_start: P, task: T) -> Result<(), E>
    where
        T: Fn(u64) -> Result<(), E> + Send + Sync + 'static,
        E: Send + 'static,
        P: FnMut(u64, u64),
    {
        let task = Arc::new(task);
        let total = self.num_batches(count);

        for batch in 0..total {
            on_start(batch + 1, total);

            let start = batch * self.batch_size;
            let end = (start + self.batch_size).min(count);
            debug!("Launching batch {}/{} (units {}..{})", batch + 1, total, start, end);

            let mut units = JoinSet::new();
            for n in start..end {
                let task = task.clone();
                units.spawn_blocking(move || (n, task(n)));
            }

            let mut first_error = None;
            let mut panic_payload: Option<Box<dyn Any + Send>> = None;

            while let Some(joined) = units.join_next().await {
                match joined {
                    Ok((_, Ok(()))) => {}
                    Ok((n, Err(err))) => {
                        if first_error.is_none() {
                            warn!("Unit {} failed; draining batch {}", n, batch + 1);
                            first_error = Some(err);
                        } else {
                            debug!("Discarding later failure of unit {}", n);
                        }
                    }
                    Err(join_err) => match join_err.try_into_panic() {
                        Ok(payload) => {
                            panic_payload.get_or_insert(payload);
                        }
                        Err(join_err) => {
                            // Only a runtime shutdown cancels a unit; never treat it as success.
                            error!("Unit lost before reporting: {}", join_err);
                            panic_payload.get_or_insert_with(|| {
                                Box::new(format!("batch unit lost before reporting: {}", join_err))
                            });
                        }
                    },
                }
            }

            if let Some(payload) = panic_payload {
                std::panic::resume_unwind(payload);
            }
            if let Some(err) = first_error {
                return Err(err);
            }
        }

        info!("Completed {} units in {} batches", count, total);
        Ok(())
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new(BatchConfig::default())
    }
}
