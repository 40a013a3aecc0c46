//! Binary encoding/decoding for transactions.
//!
//! Provides the deterministic little-endian encoding that transaction ids are
//! computed over. Variable-length fields carry a `u32` length prefix.

use crate::transaction::{Message, PermissionLevel, Transaction};
use bytes::Bytes;
use sha3::{Digest, Keccak256};
use tessera_primitives::{AccountName, H256};

/// Compute Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}

// ============================================================================
// Transaction Encoding
// ============================================================================

/// Encode a transaction body to bytes.
pub fn encode_transaction(tx: &Transaction) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&tx.ref_block_num.to_le_bytes());    // 2
    buf.extend_from_slice(&tx.ref_block_prefix.to_le_bytes()); // 4
    buf.extend_from_slice(&tx.expiration.to_le_bytes());       // 4
    buf.extend_from_slice(&(tx.scope.len() as u32).to_le_bytes());
    for account in &tx.scope {
        buf.extend_from_slice(&account.as_u64().to_le_bytes()); // 8 each
    }
    buf.extend_from_slice(&(tx.messages.len() as u32).to_le_bytes());
    for msg in &tx.messages {
        encode_message(msg, &mut buf);
    }
    buf
}

fn encode_message(msg: &Message, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&msg.code.as_u64().to_le_bytes());
    buf.extend_from_slice(&(msg.type_name.len() as u32).to_le_bytes());
    buf.extend_from_slice(msg.type_name.as_bytes());
    buf.extend_from_slice(&(msg.authorization.len() as u32).to_le_bytes());
    for level in &msg.authorization {
        buf.extend_from_slice(&level.actor.as_u64().to_le_bytes());
        buf.extend_from_slice(&level.permission.as_u64().to_le_bytes());
    }
    buf.extend_from_slice(&(msg.data.len() as u32).to_le_bytes());
    buf.extend_from_slice(&msg.data);
}

// ============================================================================
// Transaction Decoding
// ============================================================================

/// Decode a transaction body from bytes.
///
/// Returns `None` on truncated input or trailing bytes.
pub fn decode_transaction(bytes: &[u8]) -> Option<Transaction> {
    let mut reader = Reader { bytes, pos: 0 };

    let ref_block_num = u16::from_le_bytes(reader.take(2)?.try_into().ok()?);
    let ref_block_prefix = reader.u32()?;
    let expiration = reader.u32()?;

    let scope_len = reader.u32()? as usize;
    let mut scope = Vec::with_capacity(scope_len.min(1024));
    for _ in 0..scope_len {
        scope.push(AccountName::from_u64(reader.u64()?));
    }

    let message_count = reader.u32()? as usize;
    let mut messages = Vec::with_capacity(message_count.min(1024));
    for _ in 0..message_count {
        messages.push(decode_message(&mut reader)?);
    }

    if reader.pos != bytes.len() {
        return None;
    }

    Some(Transaction {
        ref_block_num,
        ref_block_prefix,
        expiration,
        scope,
        messages,
    })
}

fn decode_message(reader: &mut Reader<'_>) -> Option<Message> {
    let code = AccountName::from_u64(reader.u64()?);
    let name_len = reader.u32()? as usize;
    let type_name = String::from_utf8(reader.take(name_len)?.to_vec()).ok()?;

    let auth_count = reader.u32()? as usize;
    let mut authorization = Vec::with_capacity(auth_count.min(64));
    for _ in 0..auth_count {
        let actor = AccountName::from_u64(reader.u64()?);
        let permission = AccountName::from_u64(reader.u64()?);
        authorization.push(PermissionLevel { actor, permission });
    }

    let data_len = reader.u32()? as usize;
    let data = Bytes::copy_from_slice(reader.take(data_len)?);

    Some(Message {
        code,
        type_name,
        authorization,
        data,
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        if end > self.bytes.len() {
            return None;
        }
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    fn u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }
}
