#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

/// Reasons a plan is rejected before any buffer is allocated.
///
/// Running out of memory is not represented here: the global allocator
/// aborts the process when a buffer cannot be provided.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error(
        "buffer size of {size} bytes exceeds the maximum of {limit} bytes, increase count or decrease size"
    )]
    SizeOverflow { size: u64, limit: u64 },
}
