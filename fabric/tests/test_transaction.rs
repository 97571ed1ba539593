use std::cell::RefCell;
use std::rc::Rc;

use fabric::transaction::{Transaction, TransactionMode};

fn recorder() -> (Rc<RefCell<Vec<i32>>>, impl Fn(i32) -> Box<dyn FnOnce()>) {
    let log = Rc::new(RefCell::new(vec![]));
    let writer = log.clone();
    let record = move |value: i32| {
        let writer = writer.clone();
        let callback: Box<dyn FnOnce()> = Box::new(move || writer.borrow_mut().push(value));
        callback
    };
    (log, record)
}

#[test]
fn test_commit_hooks_run_once_at_outermost_unwind() {
    let (log, record) = recorder();
    let mut tx = Transaction::new();
    let outer = tx.open();
    tx.on_commit(record(1));
    let inner = tx.open();
    tx.on_commit(record(2));
    tx.commit(inner);
    assert!(log.borrow().is_empty());
    tx.commit(outer);
    assert_eq!(*log.borrow(), vec![1, 2]);
}

#[test]
fn test_abort_runs_undo_in_reverse_order() {
    let (log, record) = recorder();
    let mut tx = Transaction::new();
    let frame = tx.open();
    tx.on_abort(record(1));
    tx.on_abort(record(2));
    tx.abort(frame);
    assert_eq!(*log.borrow(), vec![2, 1]);
}

#[test]
fn test_aborted_nested_frame_drops_its_hooks() {
    let (log, record) = recorder();
    let mut tx = Transaction::new();
    let outer = tx.open();
    tx.on_commit(record(1));
    let inner = tx.open();
    tx.on_commit(record(9));
    tx.on_abort(record(-9));
    tx.abort(inner);
    tx.commit(outer);
    assert_eq!(*log.borrow(), vec![-9, 1]);
}

#[test]
fn test_nested_commit_merges_undo_into_parent() {
    let (log, record) = recorder();
    let mut tx = Transaction::new();
    let outer = tx.open();
    tx.on_abort(record(1));
    let inner = tx.open();
    tx.on_abort(record(2));
    tx.commit(inner);
    tx.abort(outer);
    assert_eq!(*log.borrow(), vec![2, 1]);
}

#[test]
fn test_hook_without_frames_runs_immediately() {
    let (log, record) = recorder();
    let mut tx = Transaction::new();
    tx.on_commit(record(5));
    assert_eq!(*log.borrow(), vec![5]);
}

#[test]
fn test_close_follows_mode() {
    let (log, record) = recorder();
    let mut tx = Transaction::new();
    let frame = tx.open();
    tx.on_abort(record(1));
    tx.on_commit(record(2));
    tx.close(frame, TransactionMode::Simulate);
    assert_eq!(*log.borrow(), vec![1]);

    let frame = tx.open();
    tx.on_abort(record(3));
    tx.on_commit(record(4));
    tx.close(frame, TransactionMode::Commit);
    assert_eq!(*log.borrow(), vec![1, 4]);
    assert_eq!(tx.depth(), 0);
}
