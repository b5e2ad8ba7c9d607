//! Report the progress of long-running work from a dedicated presenter thread.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use progress_dialog_lib::{Host, run};
use std::io::{self, Write};

/// Host backed by the process's standard streams.
#[derive(Debug, Clone, Default)]
pub struct ProcessHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for ProcessHost {
    fn output(&mut self) -> impl Write {
        io::stdout()
    }

    fn error(&mut self) -> impl Write {
        io::stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut ProcessHost, std::env::args()).await
}
