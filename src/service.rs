#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{Allocation, AllocationPlan, Settings};
use crate::error::AllocationError;
use crate::lib_background::allocate_background;
use crate::lib_mem::{execute, pages_per_buffer};
use crate::metrics::Metrics;
use crate::validation::validate_plan;

/// Runs allocation plans and records what they did in [`Metrics`].
#[derive(Clone)]
pub struct PressureRunner {
    metrics: Metrics,
}

impl PressureRunner {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn run(&self, settings: &Settings) -> Result<Allocation, AllocationError> {
        let plan = settings.resolve();
        self.begin(&plan, "allocate");
        let res = execute(&plan);
        self.metrics.active.set(0);
        match &res {
            Ok(allocation) => {
                let buffer_size = allocation.buffer_size();
                self.finish(&plan, allocation.len(), buffer_size);
            }
            Err(e) => self.reject(e),
        }
        res
    }

    pub fn run_background(&self, settings: &Settings) -> Result<(), AllocationError> {
        let plan = settings.resolve();
        self.begin(&plan, "background");
        let res = allocate_background(plan.count, plan.total_size, plan.physical, plan.hold);
        self.metrics.active.set(0);
        match res {
            Ok(()) => {
                // validated by the successful run above
                let buffer_size = validate_plan(&plan)?;
                self.finish(&plan, plan.count, buffer_size);
                Ok(())
            }
            Err(e) => {
                self.reject(&e);
                Err(e)
            }
        }
    }

    pub fn report(&self, allocation: &Allocation) -> MemoryReport {
        MemoryReport {
            buffers: allocation.len(),
            buffer_bytes: allocation.buffer_size(),
            total_bytes: allocation.total_bytes(),
            resident_bytes: self.metrics.resident_memory_bytes(),
        }
    }

    fn begin(&self, plan: &AllocationPlan, mode: &str) {
        info!(
            mode,
            size = %plan.total_size,
            count = plan.count,
            physical = plan.physical,
            hold_ms = plan.hold.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
            "start allocation"
        );
        self.metrics.active.set(1);
    }

    fn finish(&self, plan: &AllocationPlan, buffers: usize, buffer_size: usize) {
        let pages = if plan.physical {
            buffers.saturating_mul(pages_per_buffer(buffer_size))
        } else {
            0
        };
        self.metrics.record_run(buffers, buffer_size, pages);
        info!(buffers, buffer_size, pages, "allocation finished");
    }

    fn reject(&self, e: &AllocationError) {
        self.metrics.rejected_total.inc();
        warn!(error = %e, "allocation rejected");
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MemoryReport {
    pub buffers: usize,
    pub buffer_bytes: usize,
    pub total_bytes: u64,
    pub resident_bytes: Option<u64>,
}
