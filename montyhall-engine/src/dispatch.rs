//! Runs one batch of trials across a bounded worker pool.
//!
//! Each worker folds outcomes into a local [`BatchTally`] and adds it to the
//! shared [`WinCounters`] once per split, so the only cross-thread traffic is
//! a handful of atomic adds per batch.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::SmallRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::aggregate::BatchTally;
use crate::constants::WORKER_THREAD_PREFIX;
use crate::error::SimulationError;
use crate::game::{GameOutcome, play_round};
use crate::rng::{RandomSource, SeedPolicy};

/// Shared per-batch win counters.
#[derive(Debug, Default)]
pub struct WinCounters {
    stay: AtomicU64,
    switch: AtomicU64,
}

impl WinCounters {
    pub fn add(&self, tally: BatchTally) {
        self.stay.fetch_add(tally.wins_with_stay, Ordering::Relaxed);
        self.switch.fetch_add(tally.wins_with_switch, Ordering::Relaxed);
    }

    /// Read both counters and reset them to zero.
    pub fn take(&self) -> BatchTally {
        BatchTally {
            wins_with_stay: self.stay.swap(0, Ordering::AcqRel),
            wins_with_switch: self.switch.swap(0, Ordering::AcqRel),
        }
    }
}

/// Worker pool plus the counters its batches write into.
pub struct ParallelDispatcher {
    pool: ThreadPool,
    counters: WinCounters,
}

impl ParallelDispatcher {
    /// Build a dedicated pool of `max_concurrency` workers, each seeding its
    /// own generator on start.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to spawn the workers.
    pub fn new(max_concurrency: usize, policy: SeedPolicy) -> Result<Self, SimulationError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_concurrency.max(1))
            .thread_name(|index| format!("{WORKER_THREAD_PREFIX}-{index}"))
            .start_handler(move |index| {
                RandomSource::install(policy, u64::try_from(index).unwrap_or(u64::MAX));
            })
            .exit_handler(|_| RandomSource::release())
            .build()?;
        Ok(Self {
            pool,
            counters: WinCounters::default(),
        })
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Play `size` independent games and return the batch's win counts.
    ///
    /// # Errors
    ///
    /// A panic in any trial aborts the batch and is returned as
    /// [`SimulationError::WorkerPanicked`].
    pub fn run_batch(&self, size: u64) -> Result<BatchTally, SimulationError> {
        self.run_batch_with(size, |rng| play_round(rng))
    }

    pub(crate) fn run_batch_with<F>(&self, size: u64, trial: F) -> Result<BatchTally, SimulationError>
    where
        F: Fn(&mut SmallRng) -> GameOutcome + Sync,
    {
        let counters = &self.counters;
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                (0..size)
                    .into_par_iter()
                    .fold(BatchTally::default, |tally, _| {
                        tally.record(RandomSource::with_generator(&trial))
                    })
                    .for_each(|tally| counters.add(tally));
            });
        }));
        // Clear the counters on both paths so nothing leaks into the next batch.
        let tally = self.counters.take();
        match outcome {
            Ok(()) => Ok(tally),
            Err(payload) => Err(SimulationError::from_panic(payload.as_ref())),
        }
    }
}

impl std::fmt::Debug for ParallelDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallelDispatcher")
            .field("workers", &self.worker_count())
            .field("counters", &self.counters)
            .finish()
    }
}
