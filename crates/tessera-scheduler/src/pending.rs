//! Borrowed references to transactions awaiting block inclusion

use crate::error::CodecError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use tessera_primitives::H256;
use tessera_types::{GeneratedTransaction, SignedTransaction, Transaction};

/// Kind of a pending transaction (wire tag)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TransactionKind {
    /// User transaction with signatures
    Signed = 0,
    /// Chain-generated transaction
    Generated = 1,
}

impl TransactionKind {
    /// Wire tag
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a wire tag
    pub fn from_u8(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(TransactionKind::Signed),
            1 => Ok(TransactionKind::Generated),
            other => Err(CodecError::UnknownKind(other)),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Signed => f.write_str("signed"),
            TransactionKind::Generated => f.write_str("generated"),
        }
    }
}

/// Owned identifier of a pending transaction
///
/// Serialized as a `[kind, "0x<id>"]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "(u8, H256)", try_from = "(u8, H256)")]
pub struct TransactionRef {
    /// Transaction kind
    pub kind: TransactionKind,
    /// Transaction id
    pub id: H256,
}

impl TransactionRef {
    /// Create a reference
    pub fn new(kind: TransactionKind, id: H256) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl From<TransactionRef> for (u8, H256) {
    fn from(tx: TransactionRef) -> Self {
        (tx.kind.as_u8(), tx.id)
    }
}

impl TryFrom<(u8, H256)> for TransactionRef {
    type Error = CodecError;

    fn try_from((tag, id): (u8, H256)) -> Result<Self, Self::Error> {
        Ok(Self::new(TransactionKind::from_u8(tag)?, id))
    }
}

/// A transaction from the pool, borrowed for the duration of scheduling
///
/// Equality and hashing use reference identity: two pool entries with equal
/// contents are still distinct pending transactions.
#[derive(Clone, Copy, Debug)]
pub enum PendingTransaction<'a> {
    /// User transaction
    Signed(&'a SignedTransaction),
    /// Chain-generated transaction
    Generated(&'a GeneratedTransaction),
}

impl<'a> PendingTransaction<'a> {
    /// Transaction kind
    pub fn kind(&self) -> TransactionKind {
        match self {
            PendingTransaction::Signed(_) => TransactionKind::Signed,
            PendingTransaction::Generated(_) => TransactionKind::Generated,
        }
    }

    /// Transaction body
    pub fn transaction(&self) -> &'a Transaction {
        match *self {
            PendingTransaction::Signed(trx) => &trx.transaction,
            PendingTransaction::Generated(trx) => &trx.transaction,
        }
    }

    /// Transaction id
    pub fn id(&self) -> H256 {
        match self {
            PendingTransaction::Signed(trx) => trx.id(),
            PendingTransaction::Generated(trx) => trx.digest(),
        }
    }

    /// Owned reference (kind and id)
    pub fn to_ref(&self) -> TransactionRef {
        TransactionRef::new(self.kind(), self.id())
    }

    fn address(&self) -> *const () {
        match *self {
            PendingTransaction::Signed(trx) => trx as *const SignedTransaction as *const (),
            PendingTransaction::Generated(trx) => trx as *const GeneratedTransaction as *const (),
        }
    }
}

impl PartialEq for PendingTransaction<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.kind() == other.kind() && self.address() == other.address()
    }
}

impl Eq for PendingTransaction<'_> {}

impl Hash for PendingTransaction<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        self.address().hash(state);
    }
}

impl<'a> From<&'a SignedTransaction> for PendingTransaction<'a> {
    fn from(trx: &'a SignedTransaction) -> Self {
        PendingTransaction::Signed(trx)
    }
}

impl<'a> From<&'a GeneratedTransaction> for PendingTransaction<'a> {
    fn from(trx: &'a GeneratedTransaction) -> Self {
        PendingTransaction::Generated(trx)
    }
}

impl Serialize for PendingTransaction<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_ref().serialize(serializer)
    }
}
