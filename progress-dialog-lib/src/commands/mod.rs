//! Command-line interface for progress-dialog
//!
//! - **demo**: run a simulated workload of N stages and report it through a
//!   [`ProgressController`](crate::progress::ProgressController), on a terminal bar or as log lines
//! - **init**: write the default configuration file
//! - **validate**: check a configuration file
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate handler. Output goes through a [`Host`] so that tests can capture it.

mod common;
mod config;
mod demo;
mod host;
mod init;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use demo::{DemoArgs, SurfaceKind, run_demo};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
