#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use memory_pressure::domain::Settings;
use memory_pressure::error::AllocationError;
use memory_pressure::size::Size;
use memory_pressure::validation::{max_buffer_count, max_buffer_size, validate_plan};

#[test]
fn ok_divides_total() {
    let plan = Settings::default()
        .with_count(3)
        .with_size(Size::from_bytes(10))
        .resolve();
    assert_eq!(validate_plan(&plan), Ok(3));
}

#[test]
fn err_zero_count() {
    let plan = Settings::default().with_count(0).resolve();
    assert!(matches!(
        validate_plan(&plan),
        Err(AllocationError::InvalidConfiguration { .. })
    ));
}

#[test]
fn err_size_overflow_names_size() {
    let plan = Settings::default()
        .with_size(Size::from_bytes(u64::MAX))
        .resolve();
    let err = validate_plan(&plan).unwrap_err();
    assert_eq!(
        err,
        AllocationError::SizeOverflow {
            size: u64::MAX,
            limit: max_buffer_size()
        }
    );
    assert!(err.to_string().contains(&u64::MAX.to_string()));
}

#[test]
fn more_buffers_bring_size_under_limit() {
    let plan = Settings::default()
        .with_size(Size::from_bytes(u64::MAX))
        .with_count(1 << 20)
        .resolve();
    assert!(validate_plan(&plan).is_ok());
}

#[test]
fn err_count_too_large_for_handles() {
    let plan = Settings::default()
        .with_size(Size::from_bytes(1 << 62))
        .with_count(1 << 60)
        .resolve();
    let err = validate_plan(&plan).unwrap_err();
    assert!(matches!(err, AllocationError::InvalidConfiguration { .. }));
    assert!(err.to_string().contains(&(1usize << 60).to_string()));
}

#[test]
fn max_count_accepted_when_size_fits() {
    let plan = Settings::default()
        .with_size(Size::from_bytes(0))
        .with_count(max_buffer_count())
        .resolve();
    assert_eq!(validate_plan(&plan), Ok(0));
}
