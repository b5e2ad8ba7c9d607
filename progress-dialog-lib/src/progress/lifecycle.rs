use core::sync::atomic::{AtomicU8, Ordering};
use strum::Display;

/// Where a progress session is in its life.
///
/// Transitions only move forward: `NotStarted` → `Running` → `CloseRequested` → `Closed`,
/// with a direct `Running` → `Closed` edge when the presenter exits on its own (for example
/// after a failure or when its thread cannot be spawned). Nothing leaves `Closed`.
///
/// `show` enters `Running` as it spawns the presenter thread, not once that thread is up,
/// so `Running` also covers the window where the presenter is still building its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[repr(u8)]
pub enum SessionLifecycle {
    #[strum(to_string = "not started")]
    NotStarted = 0,

    #[strum(to_string = "running")]
    Running = 1,

    #[strum(to_string = "close requested")]
    CloseRequested = 2,

    #[strum(to_string = "closed")]
    Closed = 3,
}

impl SessionLifecycle {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::NotStarted,
            1 => Self::Running,
            2 => Self::CloseRequested,
            _ => Self::Closed,
        }
    }

    /// Whether the session still accepts state updates.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Lifecycle shared between the controller and the presenter thread.
#[derive(Debug)]
pub(crate) struct LifecycleCell(AtomicU8);

impl LifecycleCell {
    pub const fn new() -> Self {
        Self(AtomicU8::new(SessionLifecycle::NotStarted as u8))
    }

    pub fn get(&self) -> SessionLifecycle {
        SessionLifecycle::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Move from `from` to `to`. Returns `false` if the current state was not `from`.
    pub fn transition(&self, from: SessionLifecycle, to: SessionLifecycle) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn mark_closed(&self) {
        self.0.store(SessionLifecycle::Closed as u8, Ordering::Release);
    }
}
