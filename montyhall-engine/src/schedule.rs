//! Splits a run into bounded batches and tracks where the chunk loop stands.

/// Iterator over batch sizes for a run.
///
/// Yields `min(remaining, per_loop)` until every trial is covered. The sizes
/// always sum to the requested total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    remaining: u64,
    per_loop: u64,
}

impl ChunkPlan {
    /// `per_loop` of zero is treated as one so the plan always terminates.
    #[must_use]
    pub const fn new(total_trials: u64, per_loop: u64) -> Self {
        Self {
            remaining: total_trials,
            per_loop: if per_loop == 0 { 1 } else { per_loop },
        }
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Number of batches still to be yielded.
    #[must_use]
    pub const fn count_chunks(&self) -> u64 {
        self.remaining.div_ceil(self.per_loop)
    }
}

impl Iterator for ChunkPlan {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let batch = self.remaining.min(self.per_loop);
        self.remaining -= batch;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let chunks = usize::try_from(self.count_chunks()).unwrap_or(usize::MAX);
        (chunks, Some(chunks))
    }
}

/// Position of the chunk loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running { chunk: u64, size: u64 },
    Aggregated { chunk: u64, completed: u64 },
    Done { chunks: u64, completed: u64 },
}

impl SchedulerState {
    /// Enter `Running` for the next batch.
    #[must_use]
    pub fn start_chunk(self, size: u64) -> Self {
        let chunk = match self {
            Self::Idle => 0,
            Self::Aggregated { chunk, .. } => chunk + 1,
            other => {
                debug_assert!(false, "cannot start a chunk from {other:?}");
                return other;
            }
        };
        Self::Running { chunk, size }
    }

    /// Record that the running batch has been folded into the totals.
    #[must_use]
    pub fn aggregated(self, completed: u64) -> Self {
        match self {
            Self::Running { chunk, .. } => Self::Aggregated { chunk, completed },
            other => {
                debug_assert!(false, "cannot aggregate from {other:?}");
                other
            }
        }
    }

    /// Close the loop once no trials remain.
    #[must_use]
    pub fn finish(self) -> Self {
        match self {
            Self::Aggregated { chunk, completed } => Self::Done {
                chunks: chunk + 1,
                completed,
            },
            Self::Idle => Self::Done {
                chunks: 0,
                completed: 0,
            },
            other => {
                debug_assert!(false, "cannot finish from {other:?}");
                other
            }
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}
