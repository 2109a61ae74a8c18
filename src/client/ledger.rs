//! The client's local copy of the transaction list.

use crate::{Transaction, TransactionId};

/// A change to apply to a [Ledger].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerAction {
    /// Replace the whole list, e.g. after fetching it from the server.
    Load(Vec<Transaction>),
    /// Insert a newly created transaction, replacing any entry with the same ID.
    Add(Transaction),
    /// Replace the entry with the same ID. Does nothing if there is none.
    Replace(Transaction),
    /// Remove the entry with this ID. Does nothing if there is none.
    Remove(TransactionId),
}

/// Transactions ordered by date, most recent first.
///
/// Among transactions on the same date, the most recently added comes first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The transactions, most recent first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Whether the ledger has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The number of transactions in the ledger.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Apply `action`, returning whether the list changed.
    pub fn apply(&mut self, action: LedgerAction) -> bool {
        match action {
            LedgerAction::Load(mut transactions) => {
                // Stable, so the server's order is kept for equal dates.
                transactions.sort_by(|a, b| b.date.cmp(&a.date));
                let changed = transactions != self.transactions;
                self.transactions = transactions;
                changed
            }
            LedgerAction::Add(transaction) => {
                self.remove(&transaction.id);
                self.insert(transaction);
                true
            }
            LedgerAction::Replace(transaction) => {
                let Some(index) = self.position(&transaction.id) else {
                    return false;
                };

                if self.transactions[index] == transaction {
                    return false;
                }

                if self.transactions[index].date == transaction.date {
                    self.transactions[index] = transaction;
                } else {
                    self.transactions.remove(index);
                    self.insert(transaction);
                }

                true
            }
            LedgerAction::Remove(id) => self.remove(&id),
        }
    }

    fn position(&self, id: &TransactionId) -> Option<usize> {
        self.transactions
            .iter()
            .position(|transaction| &transaction.id == id)
    }

    /// Insert before every transaction on or before `transaction.date`.
    fn insert(&mut self, transaction: Transaction) {
        let index = self
            .transactions
            .partition_point(|existing| existing.date > transaction.date);
        self.transactions.insert(index, transaction);
    }

    fn remove(&mut self, id: &TransactionId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.transactions.remove(index);
                true
            }
            None => false,
        }
    }
}
