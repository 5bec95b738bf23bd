//! Monty Hall Simulation Engine
//!
//! Estimates the win rates of the "stay" and "switch" strategies by playing
//! many independent, randomised games in parallel and summing the outcomes.
//! Very large runs are split into bounded chunks so memory use stays flat,
//! and an optional observer is told about progress after every chunk.
//!
//! ```no_run
//! use montyhall_engine::{SimulationEngine, SimulatorConfig};
//!
//! let mut engine = SimulationEngine::new(SimulatorConfig::default())?;
//! let result = engine.run(1_000_000, 4)?;
//! println!("switch wins {:.3}", result.win_ratio_with_switch());
//! # Ok::<(), montyhall_engine::SimulationError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod game;
pub mod progress;
pub mod result;
pub mod rng;
pub mod schedule;

// Re-export commonly used types
pub use aggregate::{Aggregator, BatchTally};
pub use config::{ConfigError, SimulationRequest, SimulatorConfig};
pub use dispatch::{ParallelDispatcher, WinCounters};
pub use engine::SimulationEngine;
pub use error::SimulationError;
pub use game::{Door, Doors, GameOutcome, play_round};
pub use progress::{ProgressEvent, ProgressNotifier, ProgressObserver};
pub use result::SimulationResult;
pub use rng::{CountingRng, RandomSource, SeedPolicy};
pub use schedule::{ChunkPlan, SchedulerState};
