#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::io::Write;
use std::time::Duration;

use memory_pressure::config::PressureConfig;
use memory_pressure::domain::{AllocOption, Settings};
use memory_pressure::size::Size;

#[test]
fn parse_full() {
    let cfg = PressureConfig::from_json(
        r#"{"size":"64MiB","count":4,"physical":true,"hold_ms":500}"#,
    )
    .expect("parse");
    assert_eq!(
        cfg.options(),
        vec![
            AllocOption::Size(64 * Size::MEGABYTE),
            AllocOption::Count(4),
            AllocOption::Physical(true),
            AllocOption::Hold(Duration::from_millis(500)),
        ]
    );
}

#[test]
fn missing_fields_keep_defaults() {
    let cfg = PressureConfig::from_json(r#"{"size":2048}"#).expect("parse");
    let plan = Settings::from_options(cfg.options()).resolve();
    assert_eq!(plan.total_size, 2 * Size::KILOBYTE);
    assert_eq!(plan.count, 1);
    assert_eq!(plan.hold, None);
}

#[test]
fn unknown_field_rejected() {
    assert!(PressureConfig::from_json(r#"{"sise":1}"#).is_err());
}

#[test]
fn later_options_override_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tmp");
    write!(file, r#"{{"count":5}}"#).expect("write");
    let cfg = PressureConfig::from_file(file.path()).expect("load");
    let mut settings = Settings::from_options(cfg.options());
    settings.extend([AllocOption::Count(3)]);
    assert_eq!(settings.resolve().count, 3);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().expect("tmp");
    assert!(PressureConfig::from_file(&dir.path().join("absent.json")).is_err());
}
