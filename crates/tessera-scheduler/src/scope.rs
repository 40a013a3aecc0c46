//! Account scopes and the conflict model

use crate::pending::PendingTransaction;
use std::collections::BTreeSet;
use tessera_primitives::AccountName;
use tessera_types::Transaction;

/// Accounts a transaction may read or write
pub type ScopeSet = BTreeSet<AccountName>;

/// Derive the accounts a pending transaction may touch
///
/// The union of the declared scope and the target of every message.
pub fn extract_scope(trx: &PendingTransaction<'_>) -> ScopeSet {
    match trx {
        PendingTransaction::Signed(signed) => scope_of(&signed.transaction),
        PendingTransaction::Generated(generated) => scope_of(&generated.transaction),
    }
}

fn scope_of(tx: &Transaction) -> ScopeSet {
    tx.scope.iter().copied().chain(tx.message_targets()).collect()
}

/// Whether two scopes share an account
pub fn conflicts(a: &ScopeSet, b: &ScopeSet) -> bool {
    !a.is_disjoint(b)
}

/// The smallest account present in both scopes
pub fn first_overlap(a: &ScopeSet, b: &ScopeSet) -> Option<AccountName> {
    a.intersection(b).next().copied()
}
