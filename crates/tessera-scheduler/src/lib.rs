//! # tessera-scheduler
//!
//! Cycle/thread block scheduling for Tessera.
//!
//! Partitions a pool of pending transactions into an ordered list of
//! cycles. Each cycle holds threads whose account scopes are pairwise
//! disjoint, so a block producer can run the threads of a cycle in
//! parallel with a barrier between cycles.
//!
//! This crate provides:
//! - Scope extraction and the account-overlap conflict model
//! - Two greedy schedulers ([`by_threading_conflicts`], [`by_cycling_conflicts`])
//! - Fuzzing combinators ([`shuffled`], [`lossy`])
//! - [`BlockSchedule`] with validation, stats and cycle limits
//! - A binary and JSON schedule codec
//! - [`SchedulerConfig`] for choosing a scheduler at startup
//!
//! ## Architecture
//!
//! ```text
//! pool snapshot ──> [lossy] ──> [shuffled] ──> algorithm ──> BlockSchedule
//!                                                               │
//!                                   cycle 0: | thread | thread | ...
//!                                   cycle 1: | thread | ...
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use tessera_scheduler::{by_threading_conflicts, PendingTransaction};
//!
//! let pending: Vec<_> = pool.iter().map(PendingTransaction::from).collect();
//! let schedule = by_threading_conflicts(&pending, &properties);
//! schedule.validate()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod error;
pub mod fuzz;
pub mod pending;
pub mod schedule;
pub mod scheduler;
pub mod scope;

pub use codec::{decode_schedule, encode_schedule, ScheduleLayout, ThreadLayout};
pub use config::{BoxedScheduler, FuzzConfig, SchedulerConfig};
pub use error::{CodecError, SchedulerError, SchedulerResult};
pub use fuzz::{lossy, shuffled, FixedSeed, Lossy, OsEntropy, RngSource, Shuffled};
pub use pending::{PendingTransaction, TransactionKind, TransactionRef};
pub use schedule::{BlockSchedule, CycleSchedule, ScheduleStats, ThreadSchedule};
pub use scheduler::{by_cycling_conflicts, by_threading_conflicts, Algorithm, Scheduler};
pub use scope::{conflicts, extract_scope, ScopeSet};
