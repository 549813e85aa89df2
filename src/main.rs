#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use clap::Parser;
use memory_pressure::{AllocOption, Metrics, PressureConfig, PressureRunner, Settings, Size};
use tracing::info;

#[derive(Parser)]
#[command(name = "memory-pressure")]
#[command(about = "Allocate and hold memory to put a process under memory pressure")]
#[command(version)]
struct Cli {
    /// JSON file with size, count, physical and hold_ms; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total size, e.g. 512, 64k, 10MiB, 1G (binary multiples)
    #[arg(short, long)]
    size: Option<Size>,

    /// Number of buffers the size is split across
    #[arg(short, long)]
    count: Option<usize>,

    /// Touch every 4 KiB so the pages become resident
    #[arg(short, long, overrides_with = "no_physical")]
    physical: bool,

    /// Leave pages untouched even if the config enables touching
    #[arg(long, overrides_with = "physical")]
    no_physical: bool,

    /// Keep the allocation alive this many milliseconds before returning
    #[arg(long)]
    hold_ms: Option<u64>,

    /// Release each buffer right after allocating it
    #[arg(long)]
    background: bool,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    metrics: bool,
}

impl Cli {
    fn settings(&self) -> AnyResult<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_options(
                PressureConfig::from_file(path)
                    .with_context(|| format!("load config {}", path.display()))?
                    .options(),
            ),
            None => Settings::default(),
        };
        let flags = [
            self.size.map(AllocOption::Size),
            self.count.map(AllocOption::Count),
            self.physical_flag().map(AllocOption::Physical),
            self.hold_ms.map(|ms| AllocOption::Hold(Duration::from_millis(ms))),
        ];
        settings.extend(flags.into_iter().flatten());
        Ok(settings)
    }

    fn physical_flag(&self) -> Option<bool> {
        match (self.physical, self.no_physical) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

fn init_tracing() {
    let fmt = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env());
    fmt.json().init();
}

fn main() -> AnyResult<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = cli.settings()?;
    let runner = PressureRunner::new(Metrics::new()?);
    let mut out = std::io::stdout().lock();

    if cli.background {
        runner.run_background(&settings)?;
    } else {
        let allocation = runner.run(&settings)?;
        info!(%allocation, "allocation returned");
        let report = runner.report(&allocation);
        serde_json::to_writer(&mut out, &report).context("write report")?;
        writeln!(out)?;
        drop(allocation);
    }

    let released = serde_json::json!({ "resident_bytes": runner.metrics().resident_memory_bytes() });
    writeln!(out, "{released}")?;

    if cli.metrics {
        out.write_all(&runner.metrics().encode_text()?)?;
    }
    Ok(())
}
