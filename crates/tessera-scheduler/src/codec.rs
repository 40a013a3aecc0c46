//! Binary encoding/decoding for block schedules.
//!
//! The encoding carries only the schedule's shape and transaction ids, so
//! every node reproduces the same bytes for the same schedule:
//!
//! ```text
//! u32 cycle_count
//!   u32 thread_count                 (per cycle)
//!     u32 tx_count                   (per thread)
//!       u8 kind, [u8; 32] id         (per transaction)
//! ```
//!
//! All integers are little-endian.

use crate::error::{CodecError, SchedulerError, SchedulerResult};
use crate::pending::{PendingTransaction, TransactionKind, TransactionRef};
use crate::schedule::{BlockSchedule, ThreadSchedule};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tessera_primitives::H256;

/// Thread of an owned schedule layout
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadLayout {
    /// Transaction references in execution order
    pub transactions: Vec<TransactionRef>,
}

/// Owned form of a schedule, independent of any pool
///
/// Serializes to the same JSON shape as [`BlockSchedule`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLayout {
    /// Cycles in execution order
    pub cycles: Vec<Vec<ThreadLayout>>,
}

impl BlockSchedule<'_> {
    /// Owned layout of this schedule
    pub fn layout(&self) -> ScheduleLayout {
        ScheduleLayout {
            cycles: self
                .cycles
                .iter()
                .map(|cycle| {
                    cycle
                        .iter()
                        .map(|thread| ThreadLayout {
                            transactions: thread.transactions.iter().map(|t| t.to_ref()).collect(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

impl ScheduleLayout {
    /// Encode to bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(self.cycles.len() as u32).to_le_bytes());
        for cycle in &self.cycles {
            buf.extend_from_slice(&(cycle.len() as u32).to_le_bytes());
            for thread in cycle {
                buf.extend_from_slice(&(thread.transactions.len() as u32).to_le_bytes());
                for tx in &thread.transactions {
                    buf.push(tx.kind.as_u8());                  // 1
                    buf.extend_from_slice(tx.id.as_bytes());    // 32
                }
            }
        }
        buf
    }

    /// Decode from bytes, rejecting truncated input and trailing bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut pos = 0;

        let cycle_count = read_u32(bytes, &mut pos)? as usize;
        let mut cycles = Vec::with_capacity(cycle_count.min(1024));
        for _ in 0..cycle_count {
            let thread_count = read_u32(bytes, &mut pos)? as usize;
            let mut cycle = Vec::with_capacity(thread_count.min(1024));
            for _ in 0..thread_count {
                let tx_count = read_u32(bytes, &mut pos)? as usize;
                let mut transactions = Vec::with_capacity(tx_count.min(1024));
                for _ in 0..tx_count {
                    let kind = TransactionKind::from_u8(read_bytes(bytes, &mut pos, 1)?[0])?;
                    let id = H256::from_slice(read_bytes(bytes, &mut pos, 32)?)
                        .map_err(|_| CodecError::UnexpectedEof(pos))?;
                    transactions.push(TransactionRef::new(kind, id));
                }
                cycle.push(ThreadLayout { transactions });
            }
            cycles.push(cycle);
        }

        if pos != bytes.len() {
            return Err(CodecError::TrailingBytes(bytes.len() - pos));
        }
        Ok(ScheduleLayout { cycles })
    }

    /// Number of transaction references
    pub fn transaction_count(&self) -> usize {
        self.cycles
            .iter()
            .flatten()
            .map(|thread| thread.transactions.len())
            .sum()
    }

    /// Rebuild a borrowed schedule by looking ids up in `pool`
    ///
    /// Fails if a reference is missing from the pool or appears twice.
    pub fn resolve<'a>(&self, pool: &[PendingTransaction<'a>]) -> SchedulerResult<BlockSchedule<'a>> {
        let mut by_ref: HashMap<TransactionRef, PendingTransaction<'a>> = HashMap::with_capacity(pool.len());
        for trx in pool {
            by_ref.entry(trx.to_ref()).or_insert(*trx);
        }

        let mut seen = HashSet::with_capacity(self.transaction_count());
        let mut cycles = Vec::with_capacity(self.cycles.len());
        for cycle in &self.cycles {
            let mut threads = Vec::with_capacity(cycle.len());
            for thread in cycle {
                let mut transactions = Vec::with_capacity(thread.transactions.len());
                for tx in &thread.transactions {
                    let trx = by_ref
                        .get(tx)
                        .ok_or(SchedulerError::UnknownTransaction(*tx))?;
                    if !seen.insert(*tx) {
                        return Err(SchedulerError::DuplicateTransaction(*tx));
                    }
                    transactions.push(*trx);
                }
                threads.push(ThreadSchedule::new(transactions));
            }
            cycles.push(threads);
        }
        Ok(BlockSchedule::new(cycles))
    }
}

/// Encode a schedule to bytes
pub fn encode_schedule(schedule: &BlockSchedule<'_>) -> Vec<u8> {
    schedule.layout().encode()
}

/// Decode a schedule layout from bytes
pub fn decode_schedule(bytes: &[u8]) -> Result<ScheduleLayout, CodecError> {
    ScheduleLayout::decode(bytes)
}

fn read_bytes<'b>(bytes: &'b [u8], pos: &mut usize, len: usize) -> Result<&'b [u8], CodecError> {
    let end = pos
        .checked_add(len)
        .filter(|end| *end <= bytes.len())
        .ok_or(CodecError::UnexpectedEof(*pos))?;
    let slice = &bytes[*pos..end];
    *pos = end;
    Ok(slice)
}

fn read_u32(bytes: &[u8], pos: &mut usize) -> Result<u32, CodecError> {
    let slice = read_bytes(bytes, pos, 4)?;
    let mut buf = [0u8; 4];
    buf.copy_from_slice(slice);
    Ok(u32::from_le_bytes(buf))
}
