//! Transaction types for Tessera

use crate::codec::{encode_transaction, keccak256};
use bytes::Bytes;
use tessera_primitives::{AccountName, H256};

/// Authority under which a message is sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermissionLevel {
    /// Authorizing account
    pub actor: AccountName,
    /// Permission name on that account
    pub permission: AccountName,
}

impl PermissionLevel {
    /// Create a new permission level
    pub fn new(actor: AccountName, permission: AccountName) -> Self {
        Self { actor, permission }
    }
}

/// An action addressed to a contract account
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Message {
    /// Account whose code handles the message
    pub code: AccountName,
    /// Handler name within the contract
    pub type_name: String,
    /// Authorities that approved the message
    pub authorization: Vec<PermissionLevel>,
    /// Opaque message payload
    pub data: Bytes,
}

impl Message {
    /// Create a message for `code` with no authorization and no payload
    pub fn new(code: AccountName, type_name: impl Into<String>) -> Self {
        Self {
            code,
            type_name: type_name.into(),
            authorization: Vec::new(),
            data: Bytes::new(),
        }
    }
}

/// Transaction body shared by signed and generated transactions
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Transaction {
    /// Low 16 bits of a recent block number (TaPoS)
    pub ref_block_num: u16,
    /// 32 bits of the referenced block id (TaPoS)
    pub ref_block_prefix: u32,
    /// Expiration time in seconds since the epoch
    pub expiration: u32,
    /// Accounts the transaction declares it may read or write
    pub scope: Vec<AccountName>,
    /// Messages executed in order
    pub messages: Vec<Message>,
}

impl Transaction {
    /// Create a transaction with the given declared scope and messages
    pub fn new(scope: Vec<AccountName>, messages: Vec<Message>) -> Self {
        Self {
            scope,
            messages,
            ..Default::default()
        }
    }

    /// Accounts targeted by the messages, in message order (may repeat)
    pub fn message_targets(&self) -> impl Iterator<Item = AccountName> + '_ {
        self.messages.iter().map(|m| m.code)
    }

    /// Digest of the canonical encoding
    pub fn digest(&self) -> H256 {
        keccak256(&encode_transaction(self))
    }
}

/// Transaction submitted by users, carrying signatures
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SignedTransaction {
    /// Transaction body
    pub transaction: Transaction,
    /// Signatures over the body (validated upstream)
    pub signatures: Vec<Bytes>,
}

impl SignedTransaction {
    /// Wrap a transaction body with signatures
    pub fn new(transaction: Transaction, signatures: Vec<Bytes>) -> Self {
        Self {
            transaction,
            signatures,
        }
    }

    /// Transaction id
    ///
    /// Signatures are not part of the id, so re-signing does not change it.
    pub fn id(&self) -> H256 {
        self.transaction.digest()
    }
}

/// Transaction produced by the chain itself (e.g. deferred by a contract)
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GeneratedTransaction {
    /// Sequence number assigned by the generator
    pub id: u64,
    /// Transaction body
    pub transaction: Transaction,
}

impl GeneratedTransaction {
    /// Create a generated transaction
    pub fn new(id: u64, transaction: Transaction) -> Self {
        Self { id, transaction }
    }

    /// Transaction id (covers the sequence number and the body)
    pub fn digest(&self) -> H256 {
        let mut buf = Vec::new();
        buf.extend_from_slice(&self.id.to_le_bytes());
        buf.extend_from_slice(&encode_transaction(&self.transaction));
        keccak256(&buf)
    }
}
