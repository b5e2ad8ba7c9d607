use super::Host;
use super::common::{CommonArgs, init_logging};
use super::config::Config;
use crate::Result;
use crate::progress::{LogSurface, ProgressController, TerminalSurface};
use camino::Utf8Path;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Write};
use std::time::Instant;

const LOG_TARGET: &str = "      demo";

/// Where progress is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceKind {
    /// A progress bar on the terminal
    Terminal,

    /// One log line per rendered update
    Log,

    /// The terminal bar when stderr is a terminal, log lines otherwise
    Auto,
}

#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Number of stages to run (default comes from the configuration)
    #[arg(long, value_name = "COUNT")]
    pub stages: Option<u64>,

    /// Milliseconds spent on each stage (default comes from the configuration)
    #[arg(long, value_name = "MILLIS")]
    pub stage_delay_ms: Option<u64>,

    /// Description shown when the session starts
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Where progress is displayed
    #[arg(long, value_name = "SURFACE", default_value = "auto")]
    pub surface: SurfaceKind,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Run a simulated workload, reporting each stage through a progress session
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the progress session fails
pub async fn run_demo<H: Host>(host: &mut H, args: &DemoArgs) -> Result<()> {
    init_logging(args.common.log_level);

    match run_demo_inner(args).await {
        Ok((stages, elapsed)) => {
            let summary = format!("Completed {stages} stages in {:.2}s", elapsed.as_secs_f64());
            if args.common.color.use_colors_on_stdout() {
                let _ = writeln!(host.output(), "✓ {}", summary.green().bold());
            } else {
                let _ = writeln!(host.output(), "{summary}");
            }
            Ok(())
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Demo failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}

async fn run_demo_inner(args: &DemoArgs) -> Result<(u64, Duration)> {
    let config = Config::load(Utf8Path::new("."), args.common.config.as_ref())?;

    let stages = args.stages.unwrap_or(config.stages);
    let delay = args.stage_delay_ms.map_or(config.stage_delay, Duration::from_millis);
    let description = args.description.as_deref().unwrap_or(&config.description);

    let surface = match args.surface {
        SurfaceKind::Auto if std::io::stderr().is_terminal() => SurfaceKind::Terminal,
        SurfaceKind::Auto => SurfaceKind::Log,
        kind => kind,
    };

    log::info!(target: LOG_TARGET, "Running {stages} stages, {}ms each, on the {surface:?} surface", delay.as_millis());

    let mut progress = ProgressController::new();
    if surface == SurfaceKind::Terminal {
        let style = config.terminal_style(args.common.color.use_colors_on_stderr());
        progress.show(stages, description, move |max: u64, text: &str| TerminalSurface::new(&style, max, text))?;
    } else {
        progress.show(stages, description, |max: u64, text: &str| -> Result<LogSurface> {
            Ok(LogSurface::new(max, text))
        })?;
    }

    let start = Instant::now();
    for stage in 1..=stages {
        tokio::time::sleep(delay).await;
        progress.next(&format!("Processed item {stage}"))?;
    }

    progress.finish()?;
    Ok((stages, start.elapsed()))
}
