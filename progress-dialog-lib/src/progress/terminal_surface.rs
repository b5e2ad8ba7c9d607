use super::Surface;
use crate::Result;
use core::fmt::{Debug, Formatter};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use ohno::{IntoAppError, bail};

pub(super) const LOG_TARGET: &str = "  terminal";

pub const DEFAULT_TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {msg}";
pub const DEFAULT_TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {msg}";
pub const DEFAULT_PROGRESS_CHARS: &str = "=> ";

/// How a [`TerminalSurface`] draws itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalStyle {
    /// indicatif template for the bar line.
    pub template: String,

    /// Fill, head and empty glyphs of the bar.
    pub progress_chars: String,

    /// Label shown in front of the bar.
    pub prefix: String,

    /// Upper bound on background redraws per second. Forced renders ignore it.
    pub refresh_hz: u8,
}

impl Default for TerminalStyle {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            progress_chars: DEFAULT_PROGRESS_CHARS.to_string(),
            prefix: "Progress".to_string(),
            refresh_hz: 20,
        }
    }
}

impl TerminalStyle {
    /// Build the indicatif style described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not parse or fewer than two progress characters are given.
    pub fn progress_style(&self) -> Result<ProgressStyle> {
        if self.progress_chars.chars().count() < 2 {
            bail!("progress_chars needs at least two characters, got '{}'", self.progress_chars);
        }

        Ok(ProgressStyle::with_template(&self.template)
            .into_app_err_with(|| format!("parsing progress bar template '{}'", self.template))?
            .progress_chars(&self.progress_chars))
    }
}

/// A progress bar on stderr.
pub struct TerminalSurface {
    bar: ProgressBar,
}

impl TerminalSurface {
    /// Create a bar with `max_stages` slots, drawing to stderr.
    ///
    /// # Errors
    ///
    /// Returns an error if the style's template is invalid.
    pub fn new(style: &TerminalStyle, max_stages: u64, description: &str) -> Result<Self> {
        Self::with_draw_target(style, max_stages, description, ProgressDrawTarget::stderr_with_hz(style.refresh_hz))
    }

    /// Create a bar that draws nowhere. Useful when output is captured.
    ///
    /// # Errors
    ///
    /// Returns an error if the style's template is invalid.
    pub fn hidden(style: &TerminalStyle, max_stages: u64, description: &str) -> Result<Self> {
        Self::with_draw_target(style, max_stages, description, ProgressDrawTarget::hidden())
    }

    fn with_draw_target(style: &TerminalStyle, max_stages: u64, description: &str, target: ProgressDrawTarget) -> Result<Self> {
        let bar = ProgressBar::with_draw_target(Some(max_stages), target);
        bar.set_style(style.progress_style()?);
        bar.set_prefix(style.prefix.clone());
        bar.set_message(description.to_string());

        log::debug!(target: LOG_TARGET, "Created progress bar with {max_stages} stages");
        Ok(Self { bar })
    }

    /// Current bar position.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Current bar message.
    #[must_use]
    pub fn message(&self) -> String {
        self.bar.message()
    }
}

impl Surface for TerminalSurface {
    fn set_stage(&mut self, stage: u64) {
        self.bar.set_position(stage);
    }

    fn set_description(&mut self, description: &str) {
        self.bar.set_message(description.to_string());
    }

    fn force_render(&mut self) -> Result<()> {
        // suspend() redraws unconditionally once the closure returns, bypassing the rate limiter
        self.bar.suspend(|| ());
        Ok(())
    }

    fn close(&mut self) {
        self.bar.finish_and_clear();
        log::debug!(target: LOG_TARGET, "Cleared progress bar at position {}", self.bar.position());
    }
}

impl Debug for TerminalSurface {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TerminalSurface").field("bar", &self.bar).finish()
    }
}
