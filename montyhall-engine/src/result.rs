//! Aggregate outcome of a simulation run.
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Totals and timing for one call to [`SimulationEngine::run`](crate::SimulationEngine::run).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationResult {
    pub total_games_played: u64,
    pub total_threads_used: usize,
    pub total_wins_with_stay: u64,
    pub total_wins_with_switch: u64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Default for SimulationResult {
    fn default() -> Self {
        Self {
            total_games_played: 0,
            total_threads_used: 0,
            total_wins_with_stay: 0,
            total_wins_with_switch: 0,
            start_time: DateTime::<Utc>::UNIX_EPOCH,
            end_time: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

impl SimulationResult {
    /// Wall-clock length of the run. Never negative.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        (self.end_time - self.start_time)
            .to_std()
            .map_or(0.0, |d| d.as_secs_f64())
    }

    #[must_use]
    pub fn win_ratio_with_stay(&self) -> f64 {
        self.ratio(self.total_wins_with_stay)
    }

    #[must_use]
    pub fn win_ratio_with_switch(&self) -> f64 {
        self.ratio(self.total_wins_with_switch)
    }

    #[allow(clippy::cast_precision_loss)]
    fn ratio(&self, wins: u64) -> f64 {
        if self.total_games_played == 0 {
            0.0
        } else {
            wins as f64 / self.total_games_played as f64
        }
    }
}

impl Serialize for SimulationResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("SimulationResult", 9)?;
        state.serialize_field("total_games_played", &self.total_games_played)?;
        state.serialize_field("total_threads_used", &self.total_threads_used)?;
        state.serialize_field("total_wins_with_stay", &self.total_wins_with_stay)?;
        state.serialize_field("total_wins_with_switch", &self.total_wins_with_switch)?;
        state.serialize_field("start_time", &self.start_time)?;
        state.serialize_field("end_time", &self.end_time)?;
        state.serialize_field("duration_seconds", &self.duration_seconds())?;
        state.serialize_field("win_ratio_with_stay", &self.win_ratio_with_stay())?;
        state.serialize_field("win_ratio_with_switch", &self.win_ratio_with_switch())?;
        state.end()
    }
}
