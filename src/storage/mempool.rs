// Pending transaction pool

use crate::core::Transaction;

/// Ordered list of transactions awaiting inclusion in a block
#[derive(Debug, Clone, Default)]
pub struct TransactionPool {
    transactions: Vec<Transaction>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transaction
    pub fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Copy of the current contents, in arrival order
    pub fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    /// Remove one pooled copy of each sealed transaction.
    /// Transactions that arrived after the snapshot was taken stay pending.
    pub fn remove_included(&mut self, sealed: &[Transaction]) {
        for tx in sealed {
            if let Some(pos) = self.transactions.iter().position(|pending| pending == tx) {
                self.transactions.remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_clear() {
        let mut pool = TransactionPool::new();
        assert!(pool.is_empty());

        pool.push(Transaction::new("a", "b", 1.0));
        pool.push(Transaction::new("b", "c", 2.0));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.transactions()[1].recipient, "c");

        pool.clear();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_remove_included_keeps_late_arrivals() {
        let mut pool = TransactionPool::new();
        pool.push(Transaction::new("a", "b", 1.0));
        pool.push(Transaction::new("a", "b", 1.0));
        let snapshot = pool.snapshot();

        pool.push(Transaction::new("late", "b", 3.0));
        pool.remove_included(&snapshot);

        assert_eq!(pool.transactions(), &[Transaction::new("late", "b", 3.0)]);
    }

    #[test]
    fn test_remove_included_removes_one_copy_each() {
        let mut pool = TransactionPool::new();
        pool.push(Transaction::new("a", "b", 1.0));
        pool.push(Transaction::new("a", "b", 1.0));

        pool.remove_included(&[Transaction::new("a", "b", 1.0)]);
        assert_eq!(pool.len(), 1);
    }
}
