//! Cross-thread progress reporting.
//!
//! A [`ProgressController`] lives on the thread doing the work. Calling
//! [`ProgressController::show`] starts a presenter on a dedicated thread that builds a
//! [`Surface`] and keeps it in sync with the controller. The two threads communicate
//! through a single-slot mailbox: each mutation on the controller replaces the pending
//! snapshot and wakes the presenter, which renders whatever is latest. Bursts of updates
//! therefore collapse into one render, and the final state is always rendered before the
//! surface is closed.
//!
//! Presenter failures, including panics, are captured and handed back to the caller by
//! the next controller call or by [`ProgressController::finish`].

mod controller;
mod lifecycle;
mod log_surface;
mod mailbox;
mod presenter;
mod state;
mod surface;
mod terminal_surface;

pub use controller::ProgressController;
pub use lifecycle::SessionLifecycle;
pub use log_surface::LogSurface;
pub use state::{ProgressState, with_stage_suffix};
pub use surface::{Surface, SurfaceFactory};
pub use terminal_surface::{DEFAULT_PROGRESS_CHARS, DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_NO_COLOR, TerminalStyle, TerminalSurface};
