//! Block schedule: ordered cycles of parallel thread lanes
//!
//! Cycles execute strictly in sequence with a full barrier between them.
//! Threads of one cycle touch disjoint account scopes and may run on
//! independent workers; transactions of one thread run in order.

use crate::error::{SchedulerError, SchedulerResult};
use crate::pending::PendingTransaction;
use crate::scope::{extract_scope, first_overlap, ScopeSet};
use serde::Serialize;
use tessera_types::GlobalProperties;

/// Transactions run sequentially within one cycle
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ThreadSchedule<'a> {
    /// Transactions in execution order
    pub transactions: Vec<PendingTransaction<'a>>,
}

impl<'a> ThreadSchedule<'a> {
    /// Create a thread from transactions
    pub fn new(transactions: Vec<PendingTransaction<'a>>) -> Self {
        Self { transactions }
    }

    /// Number of transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Check if the thread is empty
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Union of the scopes of every transaction in the thread
    pub fn scope(&self) -> ScopeSet {
        self.transactions.iter().flat_map(extract_scope).collect()
    }
}

/// Threads executing concurrently in one cycle
pub type CycleSchedule<'a> = Vec<ThreadSchedule<'a>>;

/// Proposed execution order for a block
///
/// Borrows the pool it was built from and cannot outlive it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BlockSchedule<'a> {
    /// Cycles in execution order
    pub cycles: Vec<CycleSchedule<'a>>,
}

/// Shape summary of a schedule
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleStats {
    /// Number of cycles
    pub cycle_count: usize,
    /// Number of threads across all cycles
    pub thread_count: usize,
    /// Number of transactions
    pub transaction_count: usize,
    /// Largest thread count of any cycle
    pub max_parallelism: usize,
}

impl ScheduleStats {
    /// Average threads per cycle (0.0 for an empty schedule)
    pub fn parallelism_ratio(&self) -> f64 {
        if self.cycle_count == 0 {
            return 0.0;
        }
        self.thread_count as f64 / self.cycle_count as f64
    }
}

impl<'a> BlockSchedule<'a> {
    /// Create a schedule from cycles
    pub fn new(cycles: Vec<CycleSchedule<'a>>) -> Self {
        Self { cycles }
    }

    /// Check if the schedule has no cycles
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Number of cycles
    pub fn cycle_count(&self) -> usize {
        self.cycles.len()
    }

    /// Number of scheduled transactions
    pub fn transaction_count(&self) -> usize {
        self.cycles
            .iter()
            .flat_map(|cycle| cycle.iter())
            .map(ThreadSchedule::len)
            .sum()
    }

    /// All transactions by cycle, then thread, then position
    pub fn transactions(&self) -> impl Iterator<Item = PendingTransaction<'a>> + '_ {
        self.cycles
            .iter()
            .flat_map(|cycle| cycle.iter())
            .flat_map(|thread| thread.transactions.iter().copied())
    }

    /// Shape summary
    pub fn stats(&self) -> ScheduleStats {
        ScheduleStats {
            cycle_count: self.cycles.len(),
            thread_count: self.cycles.iter().map(Vec::len).sum(),
            transaction_count: self.transaction_count(),
            max_parallelism: self.cycles.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    /// Check that no two threads of a cycle touch the same account
    ///
    /// Reports the first violation found, scanning cycles in order.
    pub fn validate(&self) -> SchedulerResult<()> {
        for (cycle_index, cycle) in self.cycles.iter().enumerate() {
            let scopes: Vec<ScopeSet> = cycle.iter().map(ThreadSchedule::scope).collect();
            for (first, a) in scopes.iter().enumerate() {
                for (offset, b) in scopes[first + 1..].iter().enumerate() {
                    if let Some(account) = first_overlap(a, b) {
                        return Err(SchedulerError::ConflictingThreads {
                            cycle: cycle_index,
                            first,
                            second: first + 1 + offset,
                            account,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Keep the first `limit` cycles and return the transactions removed
    ///
    /// Removed transactions keep their cycle, thread, position order so the
    /// producer can carry them into the next block.
    pub fn truncate_cycles(&mut self, limit: usize) -> Vec<PendingTransaction<'a>> {
        if self.cycles.len() <= limit {
            return Vec::new();
        }
        let deferred: Vec<_> = self
            .cycles
            .drain(limit..)
            .flatten()
            .flat_map(|thread| thread.transactions)
            .collect();
        tracing::debug!(
            "Deferred {} transactions beyond cycle limit {}",
            deferred.len(),
            limit
        );
        deferred
    }

    /// Apply `max_cycles_per_block`, returning the deferred transactions
    pub fn enforce_limits(&mut self, properties: &GlobalProperties) -> Vec<PendingTransaction<'a>> {
        match properties.max_cycles_per_block {
            Some(limit) => self.truncate_cycles(limit as usize),
            None => Vec::new(),
        }
    }
}
