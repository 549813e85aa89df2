#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::time::{Duration, Instant};

use memory_pressure::error::AllocationError;
use memory_pressure::lib_background::allocate_background;
use memory_pressure::size::Size;

#[test]
fn background_runs() {
    allocate_background(8, 8 * Size::MEGABYTE, true, None).expect("ok");
    allocate_background(4, Size::KILOBYTE, false, None).expect("ok");
}

#[test]
fn background_zero_count() {
    let err = allocate_background(0, Size::MEGABYTE, false, None).unwrap_err();
    assert!(matches!(err, AllocationError::InvalidConfiguration { .. }));
}

#[test]
fn background_overflow() {
    let err = allocate_background(1, Size::from_bytes(u64::MAX), true, None).unwrap_err();
    assert!(matches!(err, AllocationError::SizeOverflow { .. }));
}

#[test]
fn background_hold() {
    let hold = Duration::from_millis(30);
    let start = Instant::now();
    allocate_background(2, Size::KILOBYTE, true, Some(hold)).expect("ok");
    assert!(start.elapsed() >= hold);
}
