use crate::Result;

/// A user-visible progress display driven by the presenter thread.
///
/// Surfaces are created, updated and closed on the presenter thread only, so
/// implementations are free to hold thread-affine resources and need not be `Send`.
pub trait Surface {
    /// Record the current stage.
    fn set_stage(&mut self, stage: u64);

    /// Record the current description.
    fn set_description(&mut self, description: &str);

    /// Flush pending changes to the display before returning.
    ///
    /// The presenter calls this after every update so that each observed state
    /// becomes visible even while the producer is reporting in a tight loop.
    fn force_render(&mut self) -> Result<()>;

    /// Tear the display down. Called exactly once, as the last call on the surface.
    fn close(&mut self);
}

/// Builds the surface for a session on the presenter thread.
pub trait SurfaceFactory: Send + 'static {
    type Surface: Surface;

    /// Construct a surface showing `description` with room for `max_stages` stages.
    fn create(self, max_stages: u64, description: &str) -> Result<Self::Surface>;
}

impl<F, S> SurfaceFactory for F
where
    F: FnOnce(u64, &str) -> Result<S> + Send + 'static,
    S: Surface,
{
    type Surface = S;

    fn create(self, max_stages: u64, description: &str) -> Result<S> {
        self(max_stages, description)
    }
}
