#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use crate::domain::AllocationPlan;
use crate::error::AllocationError;

/// Largest length a single contiguous buffer may have on this target.
#[must_use]
pub fn max_buffer_size() -> u64 {
    u64::try_from(isize::MAX.unsigned_abs()).unwrap_or(u64::MAX)
}

/// Most buffers one plan may ask for: the handles alone must fit in one allocation.
#[must_use]
pub fn max_buffer_count() -> usize {
    isize::MAX.unsigned_abs() / std::mem::size_of::<Box<[u8]>>()
}

/// Checks `plan` and returns the per-buffer length.
///
/// # Errors
///
/// [`AllocationError::InvalidConfiguration`] when the count is zero or above
/// [`max_buffer_count`], and
/// [`AllocationError::SizeOverflow`] when `total_size / count` is larger than
/// [`max_buffer_size`].
pub fn validate_plan(plan: &AllocationPlan) -> Result<usize, AllocationError> {
    if plan.count == 0 {
        return Err(AllocationError::InvalidConfiguration {
            reason: "count must be > 0".to_string(),
        });
    }
    if plan.count > max_buffer_count() {
        return Err(AllocationError::InvalidConfiguration {
            reason: format!(
                "count {} exceeds the maximum of {} buffers",
                plan.count,
                max_buffer_count()
            ),
        });
    }
    let size = plan
        .buffer_size()
        .ok_or_else(|| AllocationError::InvalidConfiguration {
            reason: format!("count {} is not representable", plan.count),
        })?;
    let limit = max_buffer_size();
    if size > limit {
        return Err(AllocationError::SizeOverflow { size, limit });
    }
    usize::try_from(size).map_err(|_| AllocationError::SizeOverflow { size, limit })
}
