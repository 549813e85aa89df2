#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result as AnyResult};
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

const RESIDENT_MEMORY: &str = "process_resident_memory_bytes";

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,
    pub allocations_total: IntCounter,
    pub buffers_allocated_total: IntCounter,
    pub bytes_allocated_total: IntCounter,
    pub pages_touched_total: IntCounter,
    pub rejected_total: IntCounter,
    pub active: IntGauge,
    pub buffer_bytes: IntGauge,
}

impl Metrics {
    pub fn new() -> AnyResult<Self> {
        let registry = Registry::new();
        let allocations_total = IntCounter::with_opts(Opts::new(
            "pressure_allocations_total",
            "completed allocation runs",
        ))
        .context("create allocations_total")?;
        let buffers_allocated_total = IntCounter::with_opts(Opts::new(
            "pressure_buffers_allocated_total",
            "buffers allocated",
        ))
        .context("create buffers_allocated_total")?;
        let bytes_allocated_total = IntCounter::with_opts(Opts::new(
            "pressure_bytes_allocated_total",
            "bytes allocated",
        ))
        .context("create bytes_allocated_total")?;
        let pages_touched_total = IntCounter::with_opts(Opts::new(
            "pressure_pages_touched_total",
            "4 KiB strides written to force residency",
        ))
        .context("create pages_touched_total")?;
        let rejected_total = IntCounter::with_opts(Opts::new(
            "pressure_rejected_total",
            "plans rejected before allocation",
        ))
        .context("create rejected_total")?;
        let active = IntGauge::with_opts(Opts::new(
            "pressure_active",
            "1 while an allocation run is in progress",
        ))
        .context("create active")?;
        let buffer_bytes = IntGauge::with_opts(Opts::new(
            "pressure_buffer_bytes",
            "per-buffer size of the last run",
        ))
        .context("create buffer_bytes")?;

        registry
            .register(Box::new(allocations_total.clone()))
            .context("register allocations_total")?;
        registry
            .register(Box::new(buffers_allocated_total.clone()))
            .context("register buffers_allocated_total")?;
        registry
            .register(Box::new(bytes_allocated_total.clone()))
            .context("register bytes_allocated_total")?;
        registry
            .register(Box::new(pages_touched_total.clone()))
            .context("register pages_touched_total")?;
        registry
            .register(Box::new(rejected_total.clone()))
            .context("register rejected_total")?;
        registry
            .register(Box::new(active.clone()))
            .context("register active")?;
        registry
            .register(Box::new(buffer_bytes.clone()))
            .context("register buffer_bytes")?;
        #[cfg(target_os = "linux")]
        registry
            .register(Box::new(
                prometheus::process_collector::ProcessCollector::for_self(),
            ))
            .context("register process collector")?;

        Ok(Self {
            registry,
            allocations_total,
            buffers_allocated_total,
            bytes_allocated_total,
            pages_touched_total,
            rejected_total,
            active,
            buffer_bytes,
        })
    }

    pub fn record_run(&self, buffers: usize, buffer_size: usize, pages_touched: usize) {
        let buffers = u64::try_from(buffers).unwrap_or(u64::MAX);
        let buffer_size_bytes = u64::try_from(buffer_size).unwrap_or(u64::MAX);
        self.allocations_total.inc();
        self.buffers_allocated_total.inc_by(buffers);
        self.bytes_allocated_total
            .inc_by(buffers.saturating_mul(buffer_size_bytes));
        self.pages_touched_total
            .inc_by(u64::try_from(pages_touched).unwrap_or(u64::MAX));
        self.buffer_bytes
            .set(i64::try_from(buffer_size).unwrap_or(i64::MAX));
    }

    /// Resident set size of this process, `None` where no process collector exists.
    #[must_use]
    pub fn resident_memory_bytes(&self) -> Option<u64> {
        self.registry
            .gather()
            .iter()
            .find(|mf| mf.get_name() == RESIDENT_MEMORY)
            .and_then(|mf| mf.get_metric().first())
            .map(|m| m.get_gauge().get_value())
            .and_then(gauge_bytes)
    }

    pub fn encode_text(&self) -> AnyResult<Vec<u8>> {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        let mf = self.registry.gather();
        encoder.encode(&mf, &mut buf).context("encode metrics")?;
        Ok(buf)
    }
}

/// Whole byte count held in a gauge; `None` outside `0..2^64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gauge_bytes(v: f64) -> Option<u64> {
    (v.is_finite() && v >= 0.0 && v < 2f64.powi(64)).then(|| v as u64)
}
