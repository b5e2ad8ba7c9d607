use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path (default is `progress.toml` in the current directory)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME));

    Config::save_default(&output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;

    #[test]
    fn test_init_writes_default_config() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let output = Utf8PathBuf::from_path_buf(temp_dir.path().join("custom.toml")).unwrap();

        let mut host = TestHost::new();
        init_config(&mut host, &InitArgs { output: Some(output.clone()) }).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, crate::commands::config::DEFAULT_CONFIG_TOML);
        assert!(host.output_str().contains("custom.toml"));
    }

    #[test]
    fn test_init_into_missing_directory_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let output = Utf8PathBuf::from_path_buf(temp_dir.path().join("missing").join("progress.toml")).unwrap();

        let mut host = TestHost::new();
        assert!(init_config(&mut host, &InitArgs { output: Some(output) }).is_err());
    }
}
