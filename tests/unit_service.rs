#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use memory_pressure::domain::Settings;
use memory_pressure::metrics::Metrics;
use memory_pressure::service::PressureRunner;
use memory_pressure::size::Size;

fn runner() -> PressureRunner {
    PressureRunner::new(Metrics::new().expect("metrics"))
}

#[test]
fn run_records_metrics() {
    let r = runner();
    let settings = Settings::default()
        .with_count(4)
        .with_size(4 * Size::MEGABYTE)
        .with_physical(true);
    let a = r.run(&settings).expect("ok");
    let report = r.report(&a);
    assert_eq!(report.buffers, 4);
    assert_eq!(report.buffer_bytes, 1 << 20);
    assert_eq!(report.total_bytes, 4 << 20);

    let m = r.metrics();
    assert_eq!(m.allocations_total.get(), 1);
    assert_eq!(m.buffers_allocated_total.get(), 4);
    assert_eq!(m.bytes_allocated_total.get(), 4 << 20);
    assert_eq!(m.pages_touched_total.get(), 4 * 256);
    assert_eq!(m.active.get(), 0);
}

#[test]
fn run_rejects_zero_count() {
    let r = runner();
    assert!(r.run(&Settings::default().with_count(0)).is_err());
    assert_eq!(r.metrics().rejected_total.get(), 1);
    assert_eq!(r.metrics().allocations_total.get(), 0);
}

#[test]
fn background_records_metrics() {
    let r = runner();
    let settings = Settings::default().with_count(3).with_size(3 * Size::KILOBYTE);
    r.run_background(&settings).expect("ok");
    assert_eq!(r.metrics().buffers_allocated_total.get(), 3);
    assert_eq!(r.metrics().pages_touched_total.get(), 0);
}
