use super::ProgressState;
use std::sync::{Condvar, Mutex};

/// What woke the presenter.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The most recent snapshot written since the previous wake.
    Update(ProgressState),

    /// Closure was requested and no snapshot is left to render.
    Close,
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<ProgressState>,
    close_requested: bool,
}

/// Single-slot, replace-on-write mailbox between the controller and the presenter.
///
/// Writers never block on the reader. A snapshot posted while nobody waits stays in the
/// slot until the next [`Mailbox::wait`], and a newer snapshot simply replaces an older
/// one, so bursts of updates collapse into the last value. A pending snapshot is always
/// handed out before a close request.
#[derive(Debug, Default)]
pub(crate) struct Mailbox {
    slot: Mutex<Slot>,
    signal: Condvar,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending snapshot and wake the presenter.
    ///
    /// Returns `false`, leaving the slot untouched, once closure has been requested.
    pub fn post(&self, state: ProgressState) -> bool {
        {
            let mut slot = self.slot.lock().expect("lock poisoned");
            if slot.close_requested {
                return false;
            }
            slot.pending = Some(state);
        }

        self.signal.notify_one();
        true
    }

    /// Ask the presenter to close. Further posts are refused.
    pub fn request_close(&self) {
        self.slot.lock().expect("lock poisoned").close_requested = true;
        self.signal.notify_one();
    }

    /// Block until a snapshot or a close request is available.
    pub fn wait(&self) -> Wake {
        let guard = self.slot.lock().expect("lock poisoned");
        let mut slot = self
            .signal
            .wait_while(guard, |slot| slot.pending.is_none() && !slot.close_requested)
            .expect("lock poisoned");

        slot.pending.take().map_or(Wake::Close, Wake::Update)
    }
}
