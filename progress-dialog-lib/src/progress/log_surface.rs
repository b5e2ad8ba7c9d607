use super::Surface;
use crate::Result;

const LOG_TARGET: &str = "  progress";

/// A surface that reports each rendered state through the `log` facade.
///
/// Meant for non-interactive runs where a redrawn terminal bar would only add noise.
#[derive(Debug, Default)]
pub struct LogSurface {
    stage: u64,
    max_stages: u64,
    description: String,
    renders: u64,
}

impl LogSurface {
    #[must_use]
    pub fn new(max_stages: u64, description: &str) -> Self {
        log::debug!(target: LOG_TARGET, "Opened log surface for {max_stages} stages");
        Self {
            stage: 0,
            max_stages,
            description: description.to_string(),
            renders: 0,
        }
    }

    /// Number of render passes performed so far.
    #[must_use]
    pub const fn renders(&self) -> u64 {
        self.renders
    }
}

impl Surface for LogSurface {
    fn set_stage(&mut self, stage: u64) {
        self.stage = stage;
    }

    fn set_description(&mut self, description: &str) {
        description.clone_into(&mut self.description);
    }

    fn force_render(&mut self) -> Result<()> {
        self.renders += 1;
        log::info!(target: LOG_TARGET, "[{}/{}] {}", self.stage, self.max_stages, self.description);
        Ok(())
    }

    fn close(&mut self) {
        log::debug!(target: LOG_TARGET, "Closed after {} render passes", self.renders);
    }
}
