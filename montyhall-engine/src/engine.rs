//! The chunk loop tying dispatch, aggregation and progress together.
use std::time::Instant;

use chrono::Utc;

use crate::aggregate::Aggregator;
use crate::config::{SimulationRequest, SimulatorConfig};
use crate::dispatch::ParallelDispatcher;
use crate::error::SimulationError;
use crate::progress::{ProgressEvent, ProgressNotifier, ProgressObserver};
use crate::result::SimulationResult;
use crate::rng::SeedPolicy;
use crate::schedule::{ChunkPlan, SchedulerState};

/// Runs Monty Hall simulations under a fixed configuration.
///
/// A run blocks the caller until every chunk has been played and aggregated.
/// Chunks execute strictly one after another; only the games inside a chunk
/// run in parallel.
#[derive(Debug)]
pub struct SimulationEngine<'a> {
    config: SimulatorConfig,
    progress: ProgressNotifier<'a>,
}

impl<'a> SimulationEngine<'a> {
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            config,
            progress: ProgressNotifier::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Subscribe to per-chunk progress, replacing any earlier subscriber.
    ///
    /// The observer runs on the calling thread between chunks, so a slow
    /// observer holds up the next chunk.
    pub fn on_progress(&mut self, observer: impl ProgressObserver + 'a) {
        self.progress.subscribe(observer);
    }

    /// Run with the configured default trial and thread counts.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_defaults(&mut self) -> Result<SimulationResult, SimulationError> {
        self.run(0, 0)
    }

    /// Play `trials` games on up to `threads` workers.
    ///
    /// Zero for either count selects the configured default; counts above the
    /// configured limits are clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot be started or a trial
    /// panics. No partial result is returned in either case.
    pub fn run(&mut self, trials: u64, threads: usize) -> Result<SimulationResult, SimulationError> {
        self.run_request(SimulationRequest {
            total_trials: trials,
            thread_count: threads,
        })
    }

    /// Execute `request` after passing it through
    /// [`SimulatorConfig::resolve`], so a request built by hand gets the same
    /// defaults and clamping as [`run`](Self::run). Resolving an already
    /// resolved request leaves it unchanged.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_request(
        &mut self,
        request: SimulationRequest,
    ) -> Result<SimulationResult, SimulationError> {
        let SimulationRequest {
            total_trials,
            thread_count,
        } = self
            .config
            .resolve(request.total_trials, request.thread_count);
        let plan = ChunkPlan::new(total_trials, self.config.max_trials_per_loop);
        log::info!(
            "simulating {total_trials} games on {thread_count} threads in {} chunks",
            plan.count_chunks()
        );

        let dispatcher =
            ParallelDispatcher::new(thread_count, SeedPolicy::from_config(self.config.seed))?;
        let mut aggregator = Aggregator::new();
        let mut state = SchedulerState::Idle;
        let mut remaining = total_trials;

        let start_time = Utc::now();
        let clock = Instant::now();

        for batch in plan {
            state = state.start_chunk(batch);
            log::debug!("dispatching chunk {state:?}");
            let tally = dispatcher.run_batch(batch)?;
            aggregator.absorb(tally);

            remaining -= batch;
            let completed = total_trials - remaining;
            state = state.aggregated(completed);

            self.progress.notify(ProgressEvent {
                completed_trials: completed,
                total_trials,
                elapsed_seconds: clock.elapsed().as_secs_f64(),
            });
        }
        state = state.finish();
        let end_time = Utc::now();
        debug_assert!(state.is_done());
        debug_assert_eq!(remaining, 0);

        let result = SimulationResult {
            total_games_played: total_trials,
            total_threads_used: thread_count,
            total_wins_with_stay: aggregator.total_wins_with_stay(),
            total_wins_with_switch: aggregator.total_wins_with_switch(),
            start_time,
            end_time,
        };
        log::info!(
            "simulation finished in {:.3}s after {} chunks: stay {:.5}, switch {:.5}",
            result.duration_seconds(),
            aggregator.batches(),
            result.win_ratio_with_stay(),
            result.win_ratio_with_switch()
        );
        Ok(result)
    }
}
