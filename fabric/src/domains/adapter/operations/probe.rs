use crate::adapter::ForeignInventory;
use crate::resources::ResourceCount;
use crate::transaction::Transaction;

/// Attempts a throwaway extraction of one unit and then of the whole stack,
/// rolling both back. Inventories that refuse extraction entirely report
/// phantom stacks, and this is the only way to find out.
pub fn probe_extractable(
    inventory: &mut dyn ForeignInventory,
    slot: usize,
    stack: &ResourceCount,
) -> bool {
    let mut tx = Transaction::default();
    let frame = tx.open();
    let mut removed = inventory.extract_slot(slot, &stack.key, 1, &mut tx);
    if removed <= 0 {
        removed = inventory.extract_slot(slot, &stack.key, stack.amount, &mut tx);
    }
    tx.abort(frame);
    removed > 0
}
