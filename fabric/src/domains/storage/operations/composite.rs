use crate::resources::{KeyCounter, ResourceKey};
use crate::storage::{CompositeStorage, Storage};
use crate::transaction::TransactionMode;

impl Storage for CompositeStorage {
    fn insert(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let mut remainder = amount;
        for part in self.parts.iter_mut() {
            if remainder == 0 {
                break;
            }
            remainder -= part.borrow_mut().insert(key, remainder, mode);
        }
        amount - remainder
    }

    fn extract(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let mut removed = 0;
        for part in self.parts.iter_mut() {
            if removed == amount {
                break;
            }
            removed += part.borrow_mut().extract(key, amount - removed, mode);
        }
        removed
    }

    fn enumerate(&mut self, out: &mut KeyCounter) {
        for part in self.parts.iter_mut() {
            part.borrow_mut().enumerate(out);
        }
    }

    fn description(&self) -> String {
        self.name.clone()
    }
}
