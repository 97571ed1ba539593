use super::probe_extractable;
use crate::adapter::{ExternalAdapter, ForeignInventory};
use crate::resources::KeyCounter;

impl ExternalAdapter {
    /// Reads every slot into the counter. In extractable only mode a stack
    /// counts only if a probe confirms the inventory actually gives it up.
    pub fn enumerate_stacks(&mut self, out: &mut KeyCounter) {
        let mut inventory = self.inventory.borrow_mut();
        for slot in 0..inventory.slots() {
            let stack = match inventory.stack(slot) {
                Some(stack) if stack.amount > 0 => stack,
                _ => continue,
            };
            if self.extractable_only && !probe_extractable(&mut *inventory, slot, &stack) {
                continue;
            }
            out.add(&stack.key, stack.amount);
        }
    }
}
