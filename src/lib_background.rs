#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::hint::black_box;
use std::time::Duration;
use tracing::debug;

use crate::domain::Settings;
use crate::error::AllocationError;
use crate::lib_mem::{new_buffer, touch_pages, wait};
use crate::size::Size;
use crate::validation::validate_plan;

/// Allocates `count` buffers of `size / count` bytes one at a time, releasing
/// each before the next is created, so at most one buffer is alive at once.
/// Nothing is returned to the caller; `hold` is honoured once after the loop.
///
/// # Errors
///
/// Same validation as [`crate::lib_mem::execute`]; nothing is allocated on error.
pub fn allocate_background(
    count: usize,
    size: Size,
    physical: bool,
    hold: Option<Duration>,
) -> Result<(), AllocationError> {
    let mut settings = Settings::default()
        .with_count(count)
        .with_size(size)
        .with_physical(physical);
    if let Some(hold) = hold {
        settings = settings.with_hold(hold);
    }
    let plan = settings.resolve();
    let buffer_size = validate_plan(&plan)?;
    debug!(count, buffer_size, physical, "background allocation");

    for _ in 0..count {
        let mut buf = new_buffer(buffer_size);
        if physical {
            touch_pages(&mut buf);
        }
        // black_box keeps the writes from being elided
        drop(black_box(buf));
    }

    if let Some(hold) = plan.hold {
        wait(hold);
    }
    Ok(())
}
