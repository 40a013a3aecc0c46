//! Error types for the scheduler

use crate::pending::TransactionRef;
use tessera_primitives::AccountName;
use tessera_types::ConfigError;
use thiserror::Error;

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Drop ratio outside `[0, 1]`
    #[error("invalid drop ratio {0}: must be within [0, 1]")]
    InvalidDropRatio(f64),

    /// The random source could not be initialized
    #[error("failed to obtain randomness: {0}")]
    Randomness(#[source] rand::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Malformed encoded schedule
    #[error("schedule codec error: {0}")]
    Codec(#[from] CodecError),

    /// Schedule references a transaction missing from the pool
    #[error("transaction {0} is not in the pool")]
    UnknownTransaction(TransactionRef),

    /// Schedule references the same transaction twice
    #[error("transaction {0} is scheduled more than once")]
    DuplicateTransaction(TransactionRef),

    /// Two threads of one cycle touch the same account
    #[error("cycle {cycle}: threads {first} and {second} both touch {account}")]
    ConflictingThreads {
        /// Cycle index
        cycle: usize,
        /// Earlier thread index
        first: usize,
        /// Later thread index
        second: usize,
        /// One account in both scopes
        account: AccountName,
    },
}

/// Errors decoding a binary schedule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Input ended before a field was complete
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),

    /// Input continues after the last cycle
    #[error("{0} trailing bytes after schedule")]
    TrailingBytes(usize),

    /// Unknown transaction kind tag
    #[error("unknown transaction kind {0}")]
    UnknownKind(u8),
}

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
