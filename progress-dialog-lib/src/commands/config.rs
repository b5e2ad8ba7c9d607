use crate::Result;
use crate::progress::TerminalStyle;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "progress.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of stages the demo workload runs
    #[serde(default = "default_stages")]
    pub stages: u64,

    /// Time spent on each stage of the demo workload
    #[serde(default = "default_stage_delay", with = "humantime_serde")]
    pub stage_delay: Duration,

    /// Description shown when the session starts
    #[serde(default = "default_description")]
    pub description: String,

    /// Label shown in front of the progress bar
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// indicatif template used when colors are enabled
    #[serde(default = "default_template")]
    pub template: String,

    /// indicatif template used when colors are disabled
    #[serde(default = "default_template_no_color")]
    pub template_no_color: String,

    /// Fill, head, and empty glyphs of the bar
    #[serde(default = "default_progress_chars")]
    pub progress_chars: String,

    /// Upper bound on background redraws per second
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u8,
}

const fn default_stages() -> u64 {
    20
}

const fn default_stage_delay() -> Duration {
    Duration::from_millis(150)
}

fn default_description() -> String {
    "Rendering icons".to_string()
}

fn default_prefix() -> String {
    "Progress".to_string()
}

fn default_template() -> String {
    crate::progress::DEFAULT_TEMPLATE.to_string()
}

fn default_template_no_color() -> String {
    crate::progress::DEFAULT_TEMPLATE_NO_COLOR.to_string()
}

fn default_progress_chars() -> String {
    crate::progress::DEFAULT_PROGRESS_CHARS.to_string()
}

const fn default_refresh_hz() -> u8 {
    20
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// When no explicit path is given, `progress.toml` in `base_dir` is used if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading progress-dialog configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    // No config file found, use defaults
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading progress-dialog configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Terminal style derived from this configuration
    #[must_use]
    pub fn terminal_style(&self, use_colors: bool) -> TerminalStyle {
        let template = if use_colors { &self.template } else { &self.template_no_color };

        TerminalStyle {
            template: template.clone(),
            progress_chars: self.progress_chars.clone(),
            prefix: self.prefix.clone(),
            refresh_hz: self.refresh_hz,
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or a template does not parse
    pub fn validate(&self) -> Result<()> {
        if self.stages == 0 {
            return Err(app_err!("stages must be at least 1"));
        }

        if self.refresh_hz == 0 {
            return Err(app_err!("refresh_hz must be at least 1"));
        }

        let _ = self.terminal_style(true).progress_style()?;
        let _ = self.terminal_style(false).progress_style()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_config_matches_field_defaults() {
        let from_empty: Config = toml::from_str("").unwrap();
        assert_eq!(from_empty, Config::default());
    }

    #[test]
    fn test_validate_zero_stages() {
        let config = Config { stages: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_refresh_rate() {
        let config = Config { refresh_hz: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_template() {
        let config = Config {
            template_no_color: "{msg:x}".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_short_progress_chars() {
        let config = Config {
            progress_chars: "#".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_terminal_style_picks_template_by_color() {
        let config = Config::default();
        assert_eq!(config.terminal_style(true).template, config.template);
        assert_eq!(config.terminal_style(false).template, config.template_no_color);
        assert_eq!(config.terminal_style(false).prefix, "Progress");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let config = Config::load(&base, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_base_dir() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        fs::write(base.join(CONFIG_FILE_NAME), "stages = 4\nstage_delay = \"2s\"\n").unwrap();

        let config = Config::load(&base, None).unwrap();
        assert_eq!(config.stages, 4);
        assert_eq!(config.stage_delay, Duration::from_secs(2));
        assert_eq!(config.prefix, "Progress");
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let missing = base.join("nope.toml");
        assert!(Config::load(&base, Some(&missing)).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let path = base.join("custom.toml");
        fs::write(&path, "stagez = 4\n").unwrap();
        assert!(Config::load(&base, Some(&path)).is_err());
    }

    #[test]
    fn test_save_default_round_trips() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let base = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap();
        let path = base.join(CONFIG_FILE_NAME);
        Config::save_default(&path).unwrap();
        assert_eq!(Config::load(&base, None).unwrap(), Config::default());
    }
}
