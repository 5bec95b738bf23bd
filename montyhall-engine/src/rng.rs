//! Per-thread pseudo-random generators.
//!
//! Every worker thread owns exactly one [`SmallRng`], stored in a thread-local
//! slot. Generators are never shared or sent between threads, so drawing from
//! one needs no synchronisation.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;

use crate::constants::{SEED_DOMAIN_CLOCK, SEED_DOMAIN_FIXED};

thread_local! {
    static GENERATOR: RefCell<Option<SmallRng>> = const { RefCell::new(None) };
}

static THREAD_ORDINAL: AtomicU64 = AtomicU64::new(0);

/// How a thread's generator is seeded on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    /// High-resolution wall clock mixed with a process-unique thread ordinal.
    Clock,
    /// Fixed base seed mixed with the worker index.
    Fixed(u64),
}

impl SeedPolicy {
    #[must_use]
    pub const fn from_config(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Fixed(seed),
            None => Self::Clock,
        }
    }

    fn seed_for(self, worker_index: u64) -> u64 {
        match self {
            Self::Clock => {
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_nanos();
                let ordinal = THREAD_ORDINAL.fetch_add(1, Ordering::Relaxed);
                derive_thread_seed(&nanos.to_le_bytes(), SEED_DOMAIN_CLOCK, ordinal)
            }
            Self::Fixed(base) => {
                derive_thread_seed(&base.to_le_bytes(), SEED_DOMAIN_FIXED, worker_index)
            }
        }
    }
}

/// Access point for the calling thread's generator.
pub struct RandomSource;

impl RandomSource {
    /// Seed the calling thread's generator, replacing any existing one.
    ///
    /// Worker pools call this from their start handler so each worker begins
    /// with its own stream.
    pub fn install(policy: SeedPolicy, worker_index: u64) {
        let seed = policy.seed_for(worker_index);
        log::trace!("worker {worker_index} seeded ({policy:?})");
        GENERATOR.with(|slot| {
            *slot.borrow_mut() = Some(SmallRng::seed_from_u64(seed));
        });
    }

    /// Drop the calling thread's generator.
    pub fn release() {
        GENERATOR.with(|slot| {
            slot.borrow_mut().take();
        });
    }

    /// Run `f` with exclusive access to the calling thread's generator,
    /// creating a clock-seeded one on first use.
    ///
    /// Must not be re-entered from inside `f`.
    pub fn with_generator<T>(f: impl FnOnce(&mut SmallRng) -> T) -> T {
        GENERATOR.with(|slot| {
            let mut slot = slot.borrow_mut();
            let rng =
                slot.get_or_insert_with(|| SmallRng::seed_from_u64(SeedPolicy::Clock.seed_for(0)));
            f(rng)
        })
    }
}

/// Generator wrapper that counts draw calls.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl<R: RngCore> CountingRng<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_thread_seed(key: &[u8], domain_tag: &[u8], ordinal: u64) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(domain_tag);
    mac.update(&ordinal.to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
