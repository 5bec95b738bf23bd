//! Running win totals across batches.
use std::ops::{Add, AddAssign};

use crate::game::GameOutcome;

/// Win counts for one strategy pair over some number of games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTally {
    pub wins_with_stay: u64,
    pub wins_with_switch: u64,
}

impl BatchTally {
    /// Count one game's outcome.
    #[must_use]
    pub fn record(self, outcome: GameOutcome) -> Self {
        Self {
            wins_with_stay: self.wins_with_stay + u64::from(outcome.won_by_staying),
            wins_with_switch: self.wins_with_switch + u64::from(outcome.won_by_switching),
        }
    }
}

impl Add for BatchTally {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            wins_with_stay: self.wins_with_stay + rhs.wins_with_stay,
            wins_with_switch: self.wins_with_switch + rhs.wins_with_switch,
        }
    }
}

impl AddAssign for BatchTally {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Totals across the whole run. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregator {
    total_wins_with_stay: u64,
    total_wins_with_switch: u64,
    batches: u64,
}

impl Aggregator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_wins_with_stay: 0,
            total_wins_with_switch: 0,
            batches: 0,
        }
    }

    /// Fold one finished batch into the totals.
    pub const fn absorb(&mut self, tally: BatchTally) {
        self.total_wins_with_stay = self.total_wins_with_stay.saturating_add(tally.wins_with_stay);
        self.total_wins_with_switch = self
            .total_wins_with_switch
            .saturating_add(tally.wins_with_switch);
        self.batches += 1;
    }

    #[must_use]
    pub const fn total_wins_with_stay(&self) -> u64 {
        self.total_wins_with_stay
    }

    #[must_use]
    pub const fn total_wins_with_switch(&self) -> u64 {
        self.total_wins_with_switch
    }

    #[must_use]
    pub const fn batches(&self) -> u64 {
        self.batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_each_flag() {
        let tally = BatchTally::default()
            .record(GameOutcome {
                won_by_staying: true,
                won_by_switching: false,
            })
            .record(GameOutcome {
                won_by_staying: false,
                won_by_switching: true,
            })
            .record(GameOutcome::default());
        assert_eq!(
            tally,
            BatchTally {
                wins_with_stay: 1,
                wins_with_switch: 1
            }
        );
    }

    #[test]
    fn absorb_accumulates_batches() {
        let mut agg = Aggregator::new();
        agg.absorb(BatchTally {
            wins_with_stay: 3,
            wins_with_switch: 7,
        });
        agg.absorb(BatchTally {
            wins_with_stay: 2,
            wins_with_switch: 8,
        });
        assert_eq!(agg.total_wins_with_stay(), 5);
        assert_eq!(agg.total_wins_with_switch(), 15);
        assert_eq!(agg.batches(), 2);
    }

    #[test]
    fn absorb_saturates_instead_of_wrapping() {
        let mut agg = Aggregator::new();
        agg.absorb(BatchTally {
            wins_with_stay: u64::MAX,
            wins_with_switch: 0,
        });
        agg.absorb(BatchTally {
            wins_with_stay: 1,
            wins_with_switch: 0,
        });
        assert_eq!(agg.total_wins_with_stay(), u64::MAX);
    }

    #[test]
    fn tallies_add() {
        let mut a = BatchTally {
            wins_with_stay: 1,
            wins_with_switch: 2,
        };
        a += BatchTally {
            wins_with_stay: 10,
            wins_with_switch: 20,
        };
        assert_eq!(a.wins_with_stay, 11);
        assert_eq!(a.wins_with_switch, 22);
    }
}
