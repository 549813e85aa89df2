#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::time::Duration;
use tracing::{debug, info};

use crate::domain::{AllocOption, Allocation, AllocationPlan, Settings};
use crate::error::AllocationError;
use crate::validation::validate_plan;

/// Distance between touched bytes. Fixed at 4 KiB whatever the native page size is.
pub const PAGE_STRIDE: usize = 4 << 10;

/// Value written at every touched offset.
pub const TOUCH_VALUE: u8 = 1;

/// Resolves `options` over the defaults and runs the resulting plan.
///
/// # Errors
///
/// See [`execute`].
pub fn allocate<I>(options: I) -> Result<Allocation, AllocationError>
where
    I: IntoIterator<Item = AllocOption>,
{
    execute(&Settings::from_options(options).resolve())
}

/// Allocates `plan.count` buffers of `total_size / count` bytes each, touches
/// them when `plan.physical` is set and sleeps for `plan.hold` before returning.
///
/// # Errors
///
/// Returns an error before allocating anything when the count is zero or the
/// per-buffer size does not fit in a single buffer.
pub fn execute(plan: &AllocationPlan) -> Result<Allocation, AllocationError> {
    let buffer_size = validate_plan(plan)?;
    debug!(count = plan.count, buffer_size, physical = plan.physical, "allocating buffers");

    let mut payload = Vec::with_capacity(plan.count);
    for _ in 0..plan.count {
        payload.push(new_buffer(buffer_size));
    }

    if plan.physical {
        let pages: usize = payload.iter_mut().map(|buf| touch_pages(buf)).sum();
        debug!(pages, "touched pages");
    }

    if let Some(hold) = plan.hold {
        wait(hold);
    }

    Ok(Allocation::new(payload))
}

/// Zeroed buffer; pages stay lazily mapped until written.
pub(crate) fn new_buffer(len: usize) -> Box<[u8]> {
    vec![0u8; len].into_boxed_slice()
}

/// Writes [`TOUCH_VALUE`] at offsets `0, 4096, 8192, ...` below `buf.len()`.
/// Returns how many bytes were written.
pub fn touch_pages(buf: &mut [u8]) -> usize {
    let mut touched = 0;
    for byte in buf.iter_mut().step_by(PAGE_STRIDE) {
        *byte = TOUCH_VALUE;
        touched += 1;
    }
    touched
}

/// Number of offsets [`touch_pages`] writes for a buffer of `len` bytes.
#[must_use]
pub fn pages_per_buffer(len: usize) -> usize {
    len.div_ceil(PAGE_STRIDE)
}

pub(crate) fn wait(hold: Duration) {
    info!(hold_ms = u64::try_from(hold.as_millis()).unwrap_or(u64::MAX), "holding allocation");
    std::thread::sleep(hold);
}
