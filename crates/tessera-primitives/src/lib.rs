//! # tessera-primitives
//!
//! Primitive types for the Tessera chain.
//!
//! This crate provides the fundamental data types used throughout the system.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account;
mod error;
mod hash;

pub use account::{AccountName, AccountNameError};
pub use error::PrimitiveError;
pub use hash::{Hash, HashError, H256};
