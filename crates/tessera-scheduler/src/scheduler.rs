//! Greedy cycle/thread schedulers
//!
//! Both algorithms make a single pass over the pool in input order, keeping
//! the accumulated scope (union of all placed scopes) of each thread in the
//! current cycle. A transaction whose scope is disjoint from every thread
//! widens the cycle while the thread bound allows, and otherwise joins the
//! earliest-opened thread. They differ in how contention is resolved:
//!
//! - [`by_threading_conflicts`] appends a transaction that conflicts with
//!   exactly one thread to that thread, so it runs after the work it
//!   contends with; only contention with several threads opens a new cycle.
//! - [`by_cycling_conflicts`] opens a new cycle on any contention.

use crate::error::SchedulerResult;
use crate::pending::PendingTransaction;
use crate::schedule::{BlockSchedule, CycleSchedule, ThreadSchedule};
use crate::scope::{conflicts, extract_scope, ScopeSet};
use serde::{Deserialize, Serialize};
use tessera_types::GlobalProperties;

/// Produces a block schedule from an ordered pool snapshot
///
/// Implemented by [`Algorithm`], the fuzz combinators, and any function
/// with the signature of [`by_threading_conflicts`].
pub trait Scheduler {
    /// Partition `transactions` into cycles of conflict-free threads
    fn schedule<'a>(
        &self,
        transactions: &[PendingTransaction<'a>],
        properties: &GlobalProperties,
    ) -> SchedulerResult<BlockSchedule<'a>>;
}

impl<F> Scheduler for F
where
    F: for<'a> Fn(&[PendingTransaction<'a>], &GlobalProperties) -> BlockSchedule<'a>,
{
    fn schedule<'a>(
        &self,
        transactions: &[PendingTransaction<'a>],
        properties: &GlobalProperties,
    ) -> SchedulerResult<BlockSchedule<'a>> {
        Ok(self(transactions, properties))
    }
}

/// Base scheduling algorithm
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// [`by_threading_conflicts`]
    #[default]
    Threading,
    /// [`by_cycling_conflicts`]
    Cycling,
}

impl Algorithm {
    /// Run the algorithm
    pub fn run<'a>(
        &self,
        transactions: &[PendingTransaction<'a>],
        properties: &GlobalProperties,
    ) -> BlockSchedule<'a> {
        match self {
            Algorithm::Threading => by_threading_conflicts(transactions, properties),
            Algorithm::Cycling => by_cycling_conflicts(transactions, properties),
        }
    }
}

impl Scheduler for Algorithm {
    fn schedule<'a>(
        &self,
        transactions: &[PendingTransaction<'a>],
        properties: &GlobalProperties,
    ) -> SchedulerResult<BlockSchedule<'a>> {
        Ok(self.run(transactions, properties))
    }
}

/// Greedy scheduler that threads contention before opening new cycles
pub fn by_threading_conflicts<'a>(
    transactions: &[PendingTransaction<'a>],
    properties: &GlobalProperties,
) -> BlockSchedule<'a> {
    let mut builder = CycleBuilder::new(properties);
    for trx in transactions {
        let scope = extract_scope(trx);
        match builder.contention(&scope) {
            Contention::Free => builder.place_free(*trx, scope),
            Contention::Single(lane) => {
                tracing::trace!(lane, "Threading transaction behind conflicting lane");
                builder.append(lane, *trx, scope);
            }
            Contention::Multiple => builder.start_cycle(*trx, scope),
        }
    }
    builder.finish("threading")
}

/// Greedy scheduler that resolves any contention with a new cycle
pub fn by_cycling_conflicts<'a>(
    transactions: &[PendingTransaction<'a>],
    properties: &GlobalProperties,
) -> BlockSchedule<'a> {
    let mut builder = CycleBuilder::new(properties);
    for trx in transactions {
        let scope = extract_scope(trx);
        match builder.contention(&scope) {
            Contention::Free => builder.place_free(*trx, scope),
            Contention::Single(_) | Contention::Multiple => builder.start_cycle(*trx, scope),
        }
    }
    builder.finish("cycling")
}

/// How a candidate's scope relates to the threads of the current cycle
enum Contention {
    /// Disjoint from every thread
    Free,
    /// Overlaps exactly one thread
    Single(usize),
    /// Overlaps two or more threads
    Multiple,
}

/// A thread of the cycle under construction
struct Lane<'a> {
    thread: ThreadSchedule<'a>,
    scope: ScopeSet,
}

struct CycleBuilder<'a> {
    cycles: Vec<CycleSchedule<'a>>,
    lanes: Vec<Lane<'a>>,
    max_threads: usize,
    transaction_count: usize,
}

impl<'a> CycleBuilder<'a> {
    fn new(properties: &GlobalProperties) -> Self {
        Self {
            cycles: Vec::new(),
            lanes: Vec::new(),
            // Unvalidated zero bound degrades to a single lane
            max_threads: properties.thread_limit().max(1),
            transaction_count: 0,
        }
    }

    fn contention(&self, scope: &ScopeSet) -> Contention {
        let mut hit = None;
        for (index, lane) in self.lanes.iter().enumerate() {
            if conflicts(&lane.scope, scope) {
                if hit.is_some() {
                    return Contention::Multiple;
                }
                hit = Some(index);
            }
        }
        match hit {
            Some(index) => Contention::Single(index),
            None => Contention::Free,
        }
    }

    /// Place a transaction that conflicts with no lane
    fn place_free(&mut self, trx: PendingTransaction<'a>, scope: ScopeSet) {
        if self.lanes.len() < self.max_threads {
            self.open_lane(trx, scope);
        } else {
            self.append(0, trx, scope);
        }
    }

    fn open_lane(&mut self, trx: PendingTransaction<'a>, scope: ScopeSet) {
        self.lanes.push(Lane {
            thread: ThreadSchedule::new(vec![trx]),
            scope,
        });
        self.transaction_count += 1;
    }

    fn append(&mut self, index: usize, trx: PendingTransaction<'a>, scope: ScopeSet) {
        let lane = &mut self.lanes[index];
        lane.thread.transactions.push(trx);
        lane.scope.extend(scope);
        self.transaction_count += 1;
    }

    /// Close the current cycle and seed a new one with `trx`
    fn start_cycle(&mut self, trx: PendingTransaction<'a>, scope: ScopeSet) {
        self.close_cycle();
        self.open_lane(trx, scope);
    }

    fn close_cycle(&mut self) {
        if self.lanes.is_empty() {
            return;
        }
        let cycle: CycleSchedule<'a> = self.lanes.drain(..).map(|lane| lane.thread).collect();
        tracing::debug!(
            "Closing cycle {} with {} threads",
            self.cycles.len(),
            cycle.len()
        );
        self.cycles.push(cycle);
    }

    fn finish(mut self, algorithm: &str) -> BlockSchedule<'a> {
        self.close_cycle();
        tracing::debug!(
            "Scheduled {} transactions into {} cycles ({})",
            self.transaction_count,
            self.cycles.len(),
            algorithm
        );
        BlockSchedule::new(self.cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_primitives::AccountName;
    use tessera_types::{GeneratedTransaction, Message, SignedTransaction, Transaction};

    fn name(s: &str) -> AccountName {
        s.parse().unwrap()
    }

    fn tx(scope: &[&str]) -> SignedTransaction {
        SignedTransaction::new(
            Transaction::new(scope.iter().map(|s| name(s)).collect(), vec![]),
            vec![],
        )
    }

    fn pending(txs: &[SignedTransaction]) -> Vec<PendingTransaction<'_>> {
        txs.iter().map(PendingTransaction::from).collect()
    }

    /// Cycle/thread layout as indices into the input pool
    fn shape(schedule: &BlockSchedule<'_>, input: &[PendingTransaction<'_>]) -> Vec<Vec<Vec<usize>>> {
        schedule
            .cycles
            .iter()
            .map(|cycle| {
                cycle
                    .iter()
                    .map(|thread| {
                        thread
                            .transactions
                            .iter()
                            .map(|t| input.iter().position(|i| i == t).unwrap())
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    // ==================== Scenarios ====================

    #[test]
    fn test_threading_scenario() {
        // A{alice}, B{bob}, C{alice} with two threads per cycle
        let pool = vec![tx(&["alice"]), tx(&["bob"]), tx(&["alice"])];
        let input = pending(&pool);
        let schedule = by_threading_conflicts(&input, &GlobalProperties::with_max_threads(2));

        assert_eq!(shape(&schedule, &input), vec![vec![vec![0, 2], vec![1]]]);
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_cycling_scenario() {
        let pool = vec![tx(&["alice"]), tx(&["bob"]), tx(&["alice"])];
        let input = pending(&pool);
        let schedule = by_cycling_conflicts(&input, &GlobalProperties::with_max_threads(1));

        assert_eq!(shape(&schedule, &input), vec![vec![vec![0, 1]], vec![vec![2]]]);
    }

    #[test]
    fn test_empty_input() {
        let props = GlobalProperties::default();
        assert!(by_threading_conflicts(&[], &props).is_empty());
        assert!(by_cycling_conflicts(&[], &props).is_empty());
    }

    #[test]
    fn test_single_transaction() {
        let pool = vec![tx(&["alice"])];
        let input = pending(&pool);
        let props = GlobalProperties::default();

        for schedule in [
            by_threading_conflicts(&input, &props),
            by_cycling_conflicts(&input, &props),
        ] {
            assert_eq!(shape(&schedule, &input), vec![vec![vec![0]]]);
        }
    }

    // ==================== Threading behaviour ====================

    #[test]
    fn test_threading_widens_independent_transactions() {
        let pool = vec![tx(&["alice"]), tx(&["bob"]), tx(&["carol"])];
        let input = pending(&pool);
        let schedule = by_threading_conflicts(&input, &GlobalProperties::with_max_threads(4));

        assert_eq!(shape(&schedule, &input), vec![vec![vec![0], vec![1], vec![2]]]);
        assert_eq!(schedule.stats().max_parallelism, 3);
    }

    #[test]
    fn test_threading_first_fit_when_full() {
        let pool = vec![tx(&["alice"]), tx(&["bob"]), tx(&["carol"]), tx(&["dave"])];
        let input = pending(&pool);
        let schedule = by_threading_conflicts(&input, &GlobalProperties::with_max_threads(2));

        assert_eq!(shape(&schedule, &input), vec![vec![vec![0, 2, 3], vec![1]]]);
    }

    #[test]
    fn test_threading_new_cycle_on_multiple_conflicts() {
        // C touches both lanes, so it cannot join either
        let pool = vec![tx(&["alice"]), tx(&["bob"]), tx(&["alice", "bob"]), tx(&["carol"])];
        let input = pending(&pool);
        let schedule = by_threading_conflicts(&input, &GlobalProperties::with_max_threads(4));

        assert_eq!(
            shape(&schedule, &input),
            vec![vec![vec![0], vec![1]], vec![vec![2], vec![3]]]
        );
    }

    #[test]
    fn test_threading_uses_accumulated_scope() {
        // B joins A's lane and brings carol; D conflicts with that lane only
        // through B.
        let pool = vec![
            tx(&["alice"]),
            tx(&["alice", "carol"]),
            tx(&["bob"]),
            tx(&["carol"]),
        ];
        let input = pending(&pool);
        let schedule = by_threading_conflicts(&input, &GlobalProperties::with_max_threads(4));

        assert_eq!(shape(&schedule, &input), vec![vec![vec![0, 1, 3], vec![2]]]);
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_threading_hot_account_single_lane() {
        let pool: Vec<_> = (0..5).map(|_| tx(&["hot"])).collect();
        let input = pending(&pool);
        let schedule = by_threading_conflicts(&input, &GlobalProperties::default());

        assert_eq!(shape(&schedule, &input), vec![vec![vec![0, 1, 2, 3, 4]]]);
    }

    // ==================== Cycling behaviour ====================

    #[test]
    fn test_cycling_hot_account_one_cycle_each() {
        let pool: Vec<_> = (0..3).map(|_| tx(&["hot"])).collect();
        let input = pending(&pool);
        let schedule = by_cycling_conflicts(&input, &GlobalProperties::default());

        assert_eq!(
            shape(&schedule, &input),
            vec![vec![vec![0]], vec![vec![1]], vec![vec![2]]]
        );
    }

    #[test]
    fn test_cycling_widens_until_conflict() {
        let pool = vec![tx(&["alice"]), tx(&["bob"]), tx(&["bob"]), tx(&["carol"])];
        let input = pending(&pool);
        let schedule = by_cycling_conflicts(&input, &GlobalProperties::with_max_threads(4));

        assert_eq!(
            shape(&schedule, &input),
            vec![vec![vec![0], vec![1]], vec![vec![2], vec![3]]]
        );
    }

    // ==================== Properties and dispatch ====================

    #[test]
    fn test_message_targets_conflict() {
        let a = SignedTransaction::new(
            Transaction::new(vec![name("alice")], vec![Message::new(name("currency"), "transfer")]),
            vec![],
        );
        let b = GeneratedTransaction::new(
            1,
            Transaction::new(vec![name("bob")], vec![Message::new(name("currency"), "issue")]),
        );
        let input = vec![PendingTransaction::from(&a), PendingTransaction::from(&b)];
        let schedule = by_cycling_conflicts(&input, &GlobalProperties::default());

        assert_eq!(schedule.cycle_count(), 2);
    }

    #[test]
    fn test_zero_thread_bound_degrades_to_single_lane() {
        let pool = vec![tx(&["alice"]), tx(&["bob"])];
        let input = pending(&pool);
        let schedule = by_threading_conflicts(&input, &GlobalProperties::with_max_threads(0));

        assert_eq!(shape(&schedule, &input), vec![vec![vec![0, 1]]]);
    }

    #[test]
    fn test_deterministic() {
        let pool = vec![tx(&["alice"]), tx(&["bob", "alice"]), tx(&["carol"]), tx(&["bob"])];
        let input = pending(&pool);
        let props = GlobalProperties::with_max_threads(2);

        assert_eq!(
            by_threading_conflicts(&input, &props),
            by_threading_conflicts(&input, &props)
        );
        assert_eq!(
            by_cycling_conflicts(&input, &props),
            by_cycling_conflicts(&input, &props)
        );
    }

    #[test]
    fn test_algorithm_dispatch() {
        let pool = vec![tx(&["alice"]), tx(&["bob"]), tx(&["alice"])];
        let input = pending(&pool);
        let props = GlobalProperties::with_max_threads(2);

        assert_eq!(
            Algorithm::Threading.schedule(&input, &props).unwrap(),
            by_threading_conflicts(&input, &props)
        );
        assert_eq!(
            Algorithm::Cycling.schedule(&input, &props).unwrap(),
            by_cycling_conflicts(&input, &props)
        );
    }

    #[test]
    fn test_functions_are_schedulers() {
        let pool = vec![tx(&["alice"])];
        let input = pending(&pool);
        let scheduler: &dyn Scheduler = &by_cycling_conflicts;
        let schedule = scheduler.schedule(&input, &GlobalProperties::default()).unwrap();
        assert_eq!(schedule.transaction_count(), 1);
    }

    #[test]
    fn test_algorithm_serde_names() {
        assert_eq!(serde_json::to_string(&Algorithm::Threading).unwrap(), "\"threading\"");
        let algo: Algorithm = serde_json::from_str("\"cycling\"").unwrap();
        assert_eq!(algo, Algorithm::Cycling);
        assert_eq!(Algorithm::default(), Algorithm::Threading);
    }
}
