//! Common error types for primitives

use crate::account::AccountNameError;
use crate::hash::HashError;
use thiserror::Error;

/// Primitive operation error
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// Account name error
    #[error("account name error: {0}")]
    AccountName(#[from] AccountNameError),

    /// Hash error
    #[error("hash error: {0}")]
    Hash(#[from] HashError),
}
