use super::presenter::{self, LOG_TARGET, SessionShared};
use super::{ProgressState, SessionLifecycle, SurfaceFactory};
use crate::Result;
use ohno::{app_err, bail};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Drives one progress session from the caller's thread.
///
/// [`show`](Self::show) starts a presenter on a dedicated thread; every mutation afterwards
/// publishes a snapshot of the new state and wakes the presenter. Updates are coalesced:
/// when several land between two wakes, only the latest one is rendered.
///
/// A controller runs at most one session. Once closed, it stays closed and every further
/// mutation is rejected.
///
/// ```no_run
/// use progress_dialog_lib::progress::{LogSurface, ProgressController};
///
/// # fn main() -> Result<(), ohno::AppError> {
/// let mut progress = ProgressController::new();
/// progress.show(3, "Starting", |max: u64, description: &str| -> Result<LogSurface, ohno::AppError> {
///     Ok(LogSurface::new(max, description))
/// })?;
/// for item in ["alpha", "beta", "gamma"] {
///     progress.next(&format!("Processed {item}"))?;
/// }
/// progress.finish()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProgressController {
    state: ProgressState,
    shared: Arc<SessionShared>,
    presenter: Option<JoinHandle<()>>,
}

impl Default for ProgressController {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ProgressState::new(0, ""),
            shared: Arc::new(SessionShared::new()),
            presenter: None,
        }
    }

    /// Start the session and its presenter thread.
    ///
    /// The surface is built by `factory` on the presenter thread, showing `description`
    /// with a `(0/max_stages)` suffix.
    ///
    /// The lifecycle moves to `Running` before the presenter thread is spawned, so a second
    /// `show` on the same controller is refused even while the first is still starting up.
    /// Updates published before the presenter has its surface wait in the mailbox. If the
    /// thread cannot be spawned, the session goes straight to `Closed`.
    ///
    /// # Errors
    ///
    /// Returns an error if this controller already ran a session or the thread cannot be spawned.
    pub fn show<F: SurfaceFactory>(&mut self, max_stages: u64, description: &str, factory: F) -> Result<()> {
        if !self.shared.lifecycle.transition(SessionLifecycle::NotStarted, SessionLifecycle::Running) {
            bail!(
                "a progress session was already started on this controller (currently {}); create a new controller",
                self.shared.lifecycle.get()
            );
        }

        self.state = ProgressState::new(max_stages, description);
        log::debug!(target: LOG_TARGET, "Showing progress for {max_stages} stages");

        match presenter::spawn(factory, self.state.clone(), Arc::clone(&self.shared)) {
            Ok(handle) => {
                self.presenter = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.shared.lifecycle.mark_closed();
                Err(e)
            }
        }
    }

    /// Advance by one stage, labelling it `"{description} ({stage}/{max_stages})"`.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is running or the presenter has failed.
    pub fn next(&mut self, description: &str) -> Result<()> {
        self.ensure_running()?;
        self.state.advance(description);
        self.publish()
    }

    /// Overwrite the current stage.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is running or the presenter has failed.
    pub fn set_stage(&mut self, stage: u64) -> Result<()> {
        self.ensure_running()?;
        self.state.stage = stage;
        self.publish()
    }

    /// Overwrite the current description verbatim, without a stage suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if no session is running or the presenter has failed.
    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.ensure_running()?;
        self.state.description = description.into();
        self.publish()
    }

    #[must_use]
    pub const fn stage(&self) -> u64 {
        self.state.stage
    }

    #[must_use]
    pub const fn max_stages(&self) -> u64 {
        self.state.max_stages
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.state.description
    }

    #[must_use]
    pub fn lifecycle(&self) -> SessionLifecycle {
        self.shared.lifecycle.get()
    }

    /// Ask the presenter to close its surface. Does not wait for it to happen.
    ///
    /// Calling this on a session that is not running is a no-op.
    pub fn close(&mut self) {
        if self.shared.lifecycle.transition(SessionLifecycle::Running, SessionLifecycle::CloseRequested) {
            log::debug!(target: LOG_TARGET, "Closing progress at stage {}/{}", self.state.stage, self.state.max_stages);
            self.shared.mailbox.request_close();
        }
    }

    /// Close the session and wait for the presenter thread to exit.
    ///
    /// # Errors
    ///
    /// Returns the presenter's failure, if it had one that was not yet reported.
    pub fn finish(&mut self) -> Result<()> {
        self.close();

        if let Some(handle) = self.presenter.take() {
            handle.join().map_err(|_panic| app_err!("the progress presenter thread panicked"))?;
        }

        self.shared.take_failure().map_or(Ok(()), Err)
    }

    fn ensure_running(&self) -> Result<()> {
        if let Some(failure) = self.shared.take_failure() {
            return Err(failure);
        }

        match self.shared.lifecycle.get() {
            state if state.is_active() => Ok(()),
            SessionLifecycle::NotStarted => bail!("no progress session is running; call show() first"),
            state => bail!("the progress session is {state} and no longer accepts updates"),
        }
    }

    fn publish(&self) -> Result<()> {
        if self.shared.mailbox.post(self.state.clone()) {
            Ok(())
        } else {
            bail!("the progress session is closing and no longer accepts updates")
        }
    }
}

impl Drop for ProgressController {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::LogSurface;

    fn log_surface(max: u64, description: &str) -> Result<LogSurface> {
        Ok(LogSurface::new(max, description))
    }

    #[test]
    fn test_new_controller_is_not_started() {
        let controller = ProgressController::new();
        assert_eq!(controller.lifecycle(), SessionLifecycle::NotStarted);
        assert_eq!(controller.stage(), 0);
    }

    #[test]
    fn test_show_formats_initial_description() {
        let mut controller = ProgressController::new();
        controller.show(5, "Working", log_surface).unwrap();
        assert_eq!(controller.description(), "Working (0/5)");
        assert_eq!(controller.max_stages(), 5);
        assert_eq!(controller.lifecycle(), SessionLifecycle::Running);
        controller.finish().unwrap();
        assert_eq!(controller.lifecycle(), SessionLifecycle::Closed);
    }

    #[test]
    fn test_next_appends_stage_suffix() {
        let mut controller = ProgressController::new();
        controller.show(3, "Start", log_surface).unwrap();
        controller.next("Step A").unwrap();
        assert_eq!(controller.stage(), 1);
        assert_eq!(controller.description(), "Step A (1/3)");
        controller.finish().unwrap();
    }

    #[test]
    fn test_setters_overwrite_verbatim() {
        let mut controller = ProgressController::new();
        controller.show(10, "Start", log_surface).unwrap();
        controller.set_stage(7).unwrap();
        controller.set_description("Manual label").unwrap();
        assert_eq!(controller.stage(), 7);
        assert_eq!(controller.description(), "Manual label");
        assert_eq!(controller.max_stages(), 10);
        controller.finish().unwrap();
    }

    #[test]
    fn test_second_show_is_rejected() {
        let mut controller = ProgressController::new();
        controller.show(2, "First", log_surface).unwrap();
        let err = controller.show(2, "Second", log_surface).unwrap_err();
        assert!(err.to_string().contains("already started"), "{err}");
        assert_eq!(controller.description(), "First (0/2)");
        controller.finish().unwrap();

        assert!(controller.show(2, "Third", log_surface).is_err());
    }

    #[test]
    fn test_running_while_presenter_builds_surface() {
        let (open_tx, open_rx) = std::sync::mpsc::channel::<()>();
        let mut controller = ProgressController::new();
        controller
            .show(2, "Start", move |max: u64, description: &str| {
                open_rx.recv().unwrap();
                log_surface(max, description)
            })
            .unwrap();

        // The presenter is still blocked in its factory.
        assert_eq!(controller.lifecycle(), SessionLifecycle::Running);
        assert!(controller.show(2, "Again", log_surface).is_err());
        controller.next("Queued").unwrap();

        open_tx.send(()).unwrap();
        controller.finish().unwrap();
        assert_eq!(controller.description(), "Queued (1/2)");
        assert_eq!(controller.lifecycle(), SessionLifecycle::Closed);
    }

    #[test]
    fn test_updates_before_show_are_rejected() {
        let mut controller = ProgressController::new();
        let err = controller.next("too early").unwrap_err();
        assert!(err.to_string().contains("show()"), "{err}");
        assert!(controller.set_stage(1).is_err());
        assert_eq!(controller.stage(), 0);
    }

    #[test]
    fn test_updates_after_close_are_rejected() {
        let mut controller = ProgressController::new();
        controller.show(3, "Start", log_surface).unwrap();
        assert!(controller.lifecycle().is_active());
        controller.close();
        assert!(!controller.lifecycle().is_active());
        assert!(controller.next("late").is_err());
        assert!(controller.set_description("late").is_err());
        assert_eq!(controller.stage(), 0);
        controller.finish().unwrap();
    }

    #[test]
    fn test_close_twice_is_noop() {
        let mut controller = ProgressController::new();
        controller.show(3, "Start", log_surface).unwrap();
        controller.close();
        controller.close();
        controller.finish().unwrap();
        controller.close();
        controller.finish().unwrap();
        assert_eq!(controller.lifecycle(), SessionLifecycle::Closed);
    }

    #[test]
    fn test_close_before_show_is_noop() {
        let mut controller = ProgressController::new();
        controller.close();
        controller.finish().unwrap();
        assert_eq!(controller.lifecycle(), SessionLifecycle::NotStarted);
    }

    #[test]
    fn test_setup_failure_surfaces_on_next_call() {
        let mut controller = ProgressController::new();
        controller
            .show(3, "Start", |_max: u64, _description: &str| -> Result<LogSurface> { bail!("no terminal attached") })
            .unwrap();

        // The presenter fails on its own thread; wait for it to wind down.
        while controller.lifecycle() != SessionLifecycle::Closed {
            std::thread::yield_now();
        }

        let err = controller.next("Step A").unwrap_err();
        assert!(err.to_string().contains("no terminal attached"), "{err}");

        // Reported once; afterwards the session simply reads as closed.
        let err = controller.next("Step B").unwrap_err();
        assert!(err.to_string().contains("closed"), "{err}");
        controller.finish().unwrap();
    }

    #[test]
    fn test_finish_reports_unobserved_failure() {
        let mut controller = ProgressController::new();
        controller
            .show(3, "Start", |_max: u64, _description: &str| -> Result<LogSurface> { bail!("no terminal attached") })
            .unwrap();

        let err = controller.finish().unwrap_err();
        assert!(err.to_string().contains("no terminal attached"), "{err}");
    }
}
