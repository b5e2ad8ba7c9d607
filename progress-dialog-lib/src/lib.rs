#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for progress-dialog
//!
//! Reports the progress of long-running work from a dedicated presenter thread.
//!
//! # Module Organization
//!
//! - [`progress`]: The controller/presenter pair, the mailbox between them, and the surfaces they drive
//! - `commands`: Command-line interface for the demo, init, and validate commands

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod progress;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub use crate::commands::{Host, run};
