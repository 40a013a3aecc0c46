//! # tessera-types
//!
//! Core chain types for Tessera.
//!
//! This crate provides:
//! - [`SignedTransaction`](transaction::SignedTransaction) and
//!   [`GeneratedTransaction`](transaction::GeneratedTransaction)
//! - [`Message`](transaction::Message) - actions addressed to a contract account
//! - [`GlobalProperties`](properties::GlobalProperties) - chain-wide bounds
//! - Canonical transaction encoding and ids

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod properties;
pub mod transaction;

// Re-export commonly used types
pub use error::ConfigError;
pub use properties::GlobalProperties;
pub use transaction::{
    GeneratedTransaction, Message, PermissionLevel, SignedTransaction, Transaction,
};
