use std::collections::HashSet;

use crate::adapter::{ExternalAdapter, ForeignInventory};
use crate::resources::PrimaryKey;

impl ExternalAdapter {
    /// Cheap read-only scan for fuzzy matching: does any slot hold a stack
    /// whose primary key is in the candidate set.
    pub fn contains_any_fuzzy(&self, candidates: &HashSet<PrimaryKey>) -> bool {
        let inventory = &*self.inventory;
        for slot in 0..inventory.slots() {
            if let Some(stack) = inventory.stack(slot) {
                if stack.amount > 0 && candidates.contains(&stack.key.primary()) {
                    return true;
                }
            }
        }
        false
    }
}
