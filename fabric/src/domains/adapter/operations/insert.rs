use log::warn;

use crate::adapter::{ExternalAdapter, ForeignInventory};
use crate::resources::ResourceKey;
use crate::transaction::{Transaction, TransactionMode};

impl ExternalAdapter {
    /// Offers the amount to every slot in order until the inventory stops
    /// accepting. The whole pass shares one transaction frame so a simulated
    /// insert leaves the inventory untouched.
    pub fn insert_stacked(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if amount <= 0 {
            return 0;
        }
        let mut tx = Transaction::default();
        let frame = tx.open();
        let mut remainder = amount;
        let mut inventory = self.inventory.borrow_mut();
        for slot in 0..inventory.slots() {
            if remainder == 0 {
                break;
            }
            let mut accepted = inventory.insert_slot(slot, key, remainder, &mut tx);
            if accepted > remainder {
                warn!(
                    "Unable to trust {}, accepted {} exceeds offered {} in slot {}",
                    inventory.description(),
                    accepted,
                    remainder,
                    slot
                );
                accepted = remainder;
            }
            if accepted > 0 {
                remainder -= accepted;
            }
        }
        drop(inventory);
        tx.close(frame, mode);
        amount - remainder
    }
}
