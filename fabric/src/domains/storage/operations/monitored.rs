use crate::resources::{KeyCounter, ResourceKey};
use crate::storage::{MonitoredStorage, Storage};
use crate::transaction::TransactionMode;

impl Storage for MonitoredStorage {
    fn insert(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        let accepted = self.inner.borrow_mut().insert(key, amount, mode);
        if mode.is_commit() && accepted > 0 {
            self.activity.borrow_mut().count += 1;
        }
        accepted
    }

    fn extract(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        let removed = self.inner.borrow_mut().extract(key, amount, mode);
        if mode.is_commit() && removed > 0 {
            self.activity.borrow_mut().count += 1;
        }
        removed
    }

    fn enumerate(&mut self, out: &mut KeyCounter) {
        self.inner.borrow_mut().enumerate(out);
    }

    fn description(&self) -> String {
        format!("monitored {}", self.inner.description())
    }
}
