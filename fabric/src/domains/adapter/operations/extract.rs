use log::warn;

use crate::adapter::{ExternalAdapter, ForeignInventory};
use crate::resources::ResourceKey;
use crate::transaction::{Transaction, TransactionMode};

impl ExternalAdapter {
    /// Drains matching slots in order. Extraction reports from the inventory
    /// are clamped to what the slot visibly held, so a misbehaving inventory
    /// cannot make the fabric conjure resources.
    ///
    /// Simulated extraction cannot loop on a slot that refills itself on
    /// every call, so when a slot returns exactly its reported stack limit
    /// the simulation assumes the remaining demand would also be served.
    pub fn extract_stacked(
        &mut self,
        key: &ResourceKey,
        amount: i64,
        mode: TransactionMode,
    ) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let mut tx = Transaction::default();
        let frame = tx.open();
        let mut needed = amount;
        let mut inventory = self.inventory.borrow_mut();
        for slot in 0..inventory.slots() {
            if needed == 0 {
                break;
            }
            loop {
                let stack = match inventory.stack(slot) {
                    Some(stack) if stack.key == *key && stack.amount > 0 => stack,
                    _ => break,
                };
                let requested = needed.min(stack.amount);
                let mut removed = inventory.extract_slot(slot, key, requested, &mut tx);
                if removed > requested {
                    warn!(
                        "Unable to trust {}, removed {} exceeds requested {} in slot {}",
                        inventory.description(),
                        removed,
                        requested,
                        slot
                    );
                    removed = requested;
                }
                if removed <= 0 {
                    break;
                }
                needed -= removed;
                if mode.is_commit() {
                    continue;
                }
                let limit = inventory.stack_limit(slot, key);
                if removed == limit && needed > 0 {
                    needed = 0;
                }
                break;
            }
        }
        drop(inventory);
        tx.close(frame, mode);
        amount - needed
    }
}
