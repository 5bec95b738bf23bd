//! Default limits and tuning constants for the simulation engine.
//!
//! These are the values a [`SimulatorConfig`](crate::config::SimulatorConfig)
//! starts from. The engine never reads them directly; it only sees the
//! configuration it was constructed with.

// Request defaults ---------------------------------------------------------
pub const DEFAULT_TRIAL_COUNT: u64 = 100_000;
pub const DEFAULT_THREAD_COUNT: usize = 1;

// Request limits -----------------------------------------------------------
#[allow(clippy::cast_sign_loss)]
pub const MAX_TRIAL_COUNT: u64 = (i64::MAX - 1) as u64;
pub const MAX_TRIALS_PER_LOOP: u64 = 1_000_000_000;

/// Share of logical cores a run may occupy, as numerator / denominator.
pub const CORE_FRACTION_NUMERATOR: usize = 3;
pub const CORE_FRACTION_DENOMINATOR: usize = 4;

// Game geometry ------------------------------------------------------------
pub const DOOR_COUNT: usize = 3;
pub(crate) const MAX_REJECTION_DRAWS: u32 = 64;

// Worker pool --------------------------------------------------------------
pub(crate) const WORKER_THREAD_PREFIX: &str = "montyhall-worker";
pub(crate) const SEED_DOMAIN_CLOCK: &[u8] = b"MHSIM-CLOCK-";
pub(crate) const SEED_DOMAIN_FIXED: &[u8] = b"MHSIM-FIXED-";
