use super::lifecycle::LifecycleCell;
use super::mailbox::{Mailbox, Wake};
use super::{ProgressState, Surface, SurfaceFactory};
use crate::Result;
use core::any::Any;
use ohno::{AppError, IntoAppError, app_err};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

pub(super) const LOG_TARGET: &str = " presenter";

const THREAD_NAME: &str = "progress-presenter";

/// State shared by the controller and the presenter thread of one session.
#[derive(Debug)]
pub(super) struct SessionShared {
    pub mailbox: Mailbox,
    pub lifecycle: LifecycleCell,
    failure: Mutex<Option<AppError>>,
}

impl SessionShared {
    pub fn new() -> Self {
        Self {
            mailbox: Mailbox::new(),
            lifecycle: LifecycleCell::new(),
            failure: Mutex::new(None),
        }
    }

    fn record_failure(&self, error: AppError) {
        let mut slot = self.failure.lock().expect("lock poisoned");
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    /// Take the presenter's failure, if any. Each failure is handed out once.
    pub fn take_failure(&self) -> Option<AppError> {
        self.failure.lock().expect("lock poisoned").take()
    }
}

/// Steady-state phases of the presenter once its surface exists.
#[derive(Debug)]
enum Phase {
    WaitingForSignal,
    Rendering(ProgressState),
    Closed,
}

/// Owns the surface of one session and keeps it in sync with the controller.
///
/// The presenter starts out waiting for its surface: the factory runs once, on the
/// presenter thread, before the phase loop begins. A factory failure ends the session
/// without a surface to tear down. Once the surface exists it is closed exactly once,
/// whether the loop ends on a close request, a render error, or a panic.
struct Presenter<F> {
    factory: F,
    initial: ProgressState,
    shared: Arc<SessionShared>,
}

/// Start the presenter for a session on its own thread.
pub(super) fn spawn<F: SurfaceFactory>(factory: F, initial: ProgressState, shared: Arc<SessionShared>) -> Result<JoinHandle<()>> {
    let presenter = Presenter { factory, initial, shared };

    thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || presenter.run())
        .into_app_err("spawning the progress presenter thread")
}

impl<F: SurfaceFactory> Presenter<F> {
    /// Thread entry point. Failures and panics end up in the session's failure slot;
    /// whatever happens, the lifecycle finishes at `Closed`.
    fn run(self) {
        let shared = Arc::clone(&self.shared);

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.present()))
            .unwrap_or_else(|payload| Err(panicked(payload.as_ref())));

        if let Err(e) = result {
            log::warn!(target: LOG_TARGET, "Progress presenter stopped: {e}");
            shared.record_failure(e);
        }

        shared.lifecycle.mark_closed();
        log::debug!(target: LOG_TARGET, "Progress presenter exited");
    }

    fn present(self) -> Result<()> {
        let Self { factory, initial, shared } = self;

        let mut surface = factory
            .create(initial.max_stages, &initial.description)
            .map_err(|e| app_err!("could not create the progress surface: {e}"))?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| follow(&mut surface, &shared.mailbox)))
            .unwrap_or_else(|payload| Err(panicked(payload.as_ref())));

        surface.close();
        result
    }
}

/// Render the initial state, then track the mailbox until a close is requested.
/// The caller closes the surface on every way out.
fn follow<S: Surface>(surface: &mut S, mailbox: &Mailbox) -> Result<()> {
    render(surface)?;

    let mut phase = Phase::WaitingForSignal;
    loop {
        phase = match phase {
            Phase::WaitingForSignal => match mailbox.wait() {
                Wake::Update(state) => Phase::Rendering(state),
                Wake::Close => Phase::Closed,
            },

            Phase::Rendering(state) => {
                log::trace!(target: LOG_TARGET, "Rendering stage {}/{}", state.stage, state.max_stages);
                surface.set_stage(state.stage);
                surface.set_description(&state.description);
                render(surface)?;
                Phase::WaitingForSignal
            }

            Phase::Closed => return Ok(()),
        };
    }
}

fn render<S: Surface>(surface: &mut S) -> Result<()> {
    surface.force_render().map_err(|e| app_err!("could not render progress: {e}"))
}

fn panicked(payload: &(dyn Any + Send)) -> AppError {
    app_err!("progress presenter panicked: {}", panic_message(payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
