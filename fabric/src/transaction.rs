use log::error;

/// Dry-run vs. real-effect mode threaded through every storage operation.
/// A `Simulate` call may be repeated any number of times and must leave no
/// persistent effect; a `Commit` moves exactly the amount it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    Simulate,
    Commit,
}

impl TransactionMode {
    #[inline]
    pub fn is_commit(&self) -> bool {
        *self == TransactionMode::Commit
    }
}

type Callback = Box<dyn FnOnce()>;

#[derive(Default)]
struct Frame {
    undo: Vec<Callback>,
    hooks: Vec<Callback>,
}

/// Explicit stack of scoped, all-or-nothing frames. Participants push undo
/// closures via `on_abort` while mutating; hooks registered via `on_commit`
/// bubble up through nested commits and run once at the committed unwind of
/// the outermost frame. Aborting a frame runs its undo log in reverse and
/// drops its hooks.
#[derive(Default)]
pub struct Transaction {
    frames: Vec<Frame>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn open(&mut self) -> usize {
        self.frames.push(Frame::default());
        self.frames.len() - 1
    }

    pub fn on_abort(&mut self, undo: impl FnOnce() + 'static) {
        if let Some(frame) = self.frames.last_mut() {
            frame.undo.push(Box::new(undo));
        }
        // a mutation outside any frame is already final
    }

    pub fn on_commit(&mut self, hook: impl FnOnce() + 'static) {
        match self.frames.last_mut() {
            Some(frame) => frame.hooks.push(Box::new(hook)),
            None => hook(),
        }
    }

    pub fn commit(&mut self, frame: usize) {
        if frame + 1 != self.frames.len() {
            error!(
                "Unable to commit frame {}, {} frames open",
                frame,
                self.frames.len()
            );
            return;
        }
        let closed = match self.frames.pop() {
            Some(closed) => closed,
            None => return,
        };
        match self.frames.last_mut() {
            Some(parent) => {
                parent.undo.extend(closed.undo);
                parent.hooks.extend(closed.hooks);
            }
            None => {
                for hook in closed.hooks {
                    hook();
                }
            }
        }
    }

    pub fn abort(&mut self, frame: usize) {
        if frame + 1 != self.frames.len() {
            error!(
                "Unable to abort frame {}, {} frames open",
                frame,
                self.frames.len()
            );
            return;
        }
        let mut closed = match self.frames.pop() {
            Some(closed) => closed,
            None => return,
        };
        while let Some(undo) = closed.undo.pop() {
            undo();
        }
    }

    pub fn close(&mut self, frame: usize, mode: TransactionMode) {
        match mode {
            TransactionMode::Commit => self.commit(frame),
            TransactionMode::Simulate => self.abort(frame),
        }
    }
}
