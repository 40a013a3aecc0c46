//! Fuzzing wrappers around schedulers
//!
//! [`shuffled`] and [`lossy`] reshape the input before delegating to another
//! scheduler. Every call builds its own generator from a [`RngSource`], so
//! concurrent calls never share random state and seeded runs are
//! reproducible.

use crate::error::{SchedulerError, SchedulerResult};
use crate::pending::PendingTransaction;
use crate::schedule::BlockSchedule;
use crate::scheduler::Scheduler;
use rand::rngs::{OsRng, StdRng};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tessera_types::GlobalProperties;

/// Creates a fresh generator for each scheduling call
pub trait RngSource {
    /// Build a generator, or report why randomness is unavailable
    fn rng(&self) -> Result<StdRng, rand::Error>;
}

/// Seeds each generator from the operating system
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEntropy;

impl RngSource for OsEntropy {
    fn rng(&self) -> Result<StdRng, rand::Error> {
        StdRng::from_rng(OsRng)
    }
}

/// Seeds each generator with the same value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl RngSource for FixedSeed {
    fn rng(&self) -> Result<StdRng, rand::Error> {
        Ok(StdRng::seed_from_u64(self.0))
    }
}

/// Scheduler that permutes its input uniformly before delegating
#[derive(Clone, Debug)]
pub struct Shuffled<S, R = OsEntropy> {
    next: S,
    source: R,
}

/// Wrap `next` so it sees a random permutation of the input
pub fn shuffled<S: Scheduler>(next: S) -> Shuffled<S> {
    Shuffled {
        next,
        source: OsEntropy,
    }
}

impl<S, R> Shuffled<S, R> {
    /// Replace the random source
    pub fn with_source<R2: RngSource>(self, source: R2) -> Shuffled<S, R2> {
        Shuffled {
            next: self.next,
            source,
        }
    }
}

impl<S: Scheduler, R: RngSource> Scheduler for Shuffled<S, R> {
    fn schedule<'a>(
        &self,
        transactions: &[PendingTransaction<'a>],
        properties: &GlobalProperties,
    ) -> SchedulerResult<BlockSchedule<'a>> {
        let mut rng = self.source.rng().map_err(SchedulerError::Randomness)?;
        let mut copy = transactions.to_vec();
        copy.shuffle(&mut rng);
        tracing::debug!("Shuffled {} transactions", copy.len());
        self.next.schedule(&copy, properties)
    }
}

/// Scheduler that drops each transaction with a fixed probability
#[derive(Clone, Debug)]
pub struct Lossy<S, R = OsEntropy> {
    drop_ratio: f64,
    next: S,
    source: R,
}

/// Wrap `next` so each transaction is dropped with probability `drop_ratio`
///
/// Fails unless `drop_ratio` lies within `[0, 1]`.
pub fn lossy<S: Scheduler>(drop_ratio: f64, next: S) -> SchedulerResult<Lossy<S>> {
    if !(0.0..=1.0).contains(&drop_ratio) {
        return Err(SchedulerError::InvalidDropRatio(drop_ratio));
    }
    Ok(Lossy {
        drop_ratio,
        next,
        source: OsEntropy,
    })
}

impl<S, R> Lossy<S, R> {
    /// Replace the random source
    pub fn with_source<R2: RngSource>(self, source: R2) -> Lossy<S, R2> {
        Lossy {
            drop_ratio: self.drop_ratio,
            next: self.next,
            source,
        }
    }

    /// Probability of dropping each transaction
    pub fn drop_ratio(&self) -> f64 {
        self.drop_ratio
    }
}

impl<S: Scheduler, R: RngSource> Scheduler for Lossy<S, R> {
    fn schedule<'a>(
        &self,
        transactions: &[PendingTransaction<'a>],
        properties: &GlobalProperties,
    ) -> SchedulerResult<BlockSchedule<'a>> {
        let mut rng = self.source.rng().map_err(SchedulerError::Randomness)?;
        let retained: Vec<_> = transactions
            .iter()
            .copied()
            .filter(|_| rng.gen::<f64>() >= self.drop_ratio)
            .collect();
        tracing::debug!(
            "Lossy scheduler kept {} of {} transactions",
            retained.len(),
            transactions.len()
        );
        self.next.schedule(&retained, properties)
    }
}
