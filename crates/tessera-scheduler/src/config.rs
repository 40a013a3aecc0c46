//! Scheduler configuration

use crate::error::{SchedulerError, SchedulerResult};
use crate::fuzz::{lossy, shuffled, FixedSeed};
use crate::pending::PendingTransaction;
use crate::schedule::BlockSchedule;
use crate::scheduler::{Algorithm, Scheduler};
use serde::{Deserialize, Serialize};
use std::fmt;
use tessera_types::{ConfigError, GlobalProperties};

/// Which scheduler a block producer runs
///
/// ```json
/// { "algorithm": "cycling", "fuzz": { "shuffle": true, "drop_ratio": 0.1, "seed": 7 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Base algorithm
    #[serde(default)]
    pub algorithm: Algorithm,
    /// Fuzzing layers (off by default)
    #[serde(default)]
    pub fuzz: FuzzConfig,
}

/// Fuzzing layers stacked on the base algorithm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuzzConfig {
    /// Shuffle the pool before scheduling
    #[serde(default)]
    pub shuffle: bool,
    /// Drop each transaction with this probability
    #[serde(default)]
    pub drop_ratio: Option<f64>,
    /// Seed for every random layer; OS entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SchedulerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> SchedulerResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::InvalidValue {
            field: "scheduler",
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fuzz settings
    pub fn validate(&self) -> SchedulerResult<()> {
        match self.fuzz.drop_ratio {
            Some(ratio) if !(0.0..=1.0).contains(&ratio) => {
                Err(SchedulerError::InvalidDropRatio(ratio))
            }
            _ => Ok(()),
        }
    }

    /// Build the configured scheduler
    ///
    /// Layers stack as `lossy(shuffled(algorithm))`, each present only when
    /// configured.
    pub fn build(&self) -> SchedulerResult<BoxedScheduler> {
        self.validate()?;
        let mut scheduler = BoxedScheduler::new(self.algorithm);

        if self.fuzz.shuffle {
            scheduler = match self.fuzz.seed {
                Some(seed) => BoxedScheduler::new(shuffled(scheduler).with_source(FixedSeed(seed))),
                None => BoxedScheduler::new(shuffled(scheduler)),
            };
        }

        if let Some(ratio) = self.fuzz.drop_ratio {
            let layer = lossy(ratio, scheduler)?;
            scheduler = match self.fuzz.seed {
                Some(seed) => BoxedScheduler::new(layer.with_source(FixedSeed(seed))),
                None => BoxedScheduler::new(layer),
            };
        }

        tracing::info!(
            "Built {:?} scheduler (shuffle: {}, drop ratio: {:?}, seeded: {})",
            self.algorithm,
            self.fuzz.shuffle,
            self.fuzz.drop_ratio,
            self.fuzz.seed.is_some()
        );
        Ok(scheduler)
    }
}

/// Type-erased scheduler shareable across threads
pub struct BoxedScheduler(Box<dyn Scheduler + Send + Sync>);

impl BoxedScheduler {
    /// Box a scheduler
    pub fn new<S: Scheduler + Send + Sync + 'static>(scheduler: S) -> Self {
        Self(Box::new(scheduler))
    }
}

impl Scheduler for BoxedScheduler {
    fn schedule<'a>(
        &self,
        transactions: &[PendingTransaction<'a>],
        properties: &GlobalProperties,
    ) -> SchedulerResult<BlockSchedule<'a>> {
        self.0.schedule(transactions, properties)
    }
}

impl fmt::Debug for BoxedScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxedScheduler")
    }
}
