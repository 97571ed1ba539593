use crate::resources::{KeyCounter, ResourceKey};
use crate::storage::{Cell, Storage};
use crate::transaction::TransactionMode;

impl Storage for Cell {
    fn insert(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let free = self.kind.capacity - self.content.total();
        let accepted = amount.min(free).max(0);
        if accepted > 0 && mode.is_commit() {
            self.content.add(key, accepted);
        }
        accepted
    }

    fn extract(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let removed = amount.min(self.content.get(key));
        if removed > 0 && mode.is_commit() {
            self.content.add(key, -removed);
        }
        removed
    }

    fn enumerate(&mut self, out: &mut KeyCounter) {
        out.merge(&self.content);
    }

    fn description(&self) -> String {
        format!("{} cell {}", self.kind.name, self.id.0)
    }
}
