use crate::resources::ResourceKey;
use crate::storage::Storage;
use crate::transaction::{Transaction, TransactionMode};
use crate::tunnel::Tunnel;

impl Tunnel {
    /// Splits the amount evenly over the outputs. Whatever an output refuses
    /// carries forward to the next one; a tail smaller than the even share
    /// stays with the source. Energy tax applies to the moved total and is
    /// deducted only on commit.
    pub fn distribute(&mut self, key: &ResourceKey, amount: i64, mode: TransactionMode) -> i64 {
        if amount <= 0 || self.outputs.is_empty() {
            return 0;
        }
        let mut tx = Transaction::default();
        let frame = tx.open();
        let per_output = amount / self.outputs.len() as i64;
        let mut overflow = if per_output == 0 {
            amount
        } else {
            amount % per_output
        };
        let mut total = 0;
        for output in self.outputs.iter_mut() {
            let attempt = per_output + overflow;
            if attempt == 0 {
                continue;
            }
            let accepted = output.borrow_mut().insert(key, attempt, mode);
            overflow = attempt - accepted;
            total += accepted;
        }
        self.charge(key, total, &mut tx);
        tx.close(frame, mode);
        total
    }
}
