#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use memory_pressure::metrics::Metrics;

#[test]
fn create_and_encode() {
    let m = Metrics::new().expect("metrics");
    m.record_run(2, 4096, 2);
    let buf = m.encode_text().expect("encode");
    let text = String::from_utf8(buf).expect("utf8");
    assert!(text.contains("pressure_bytes_allocated_total 8192"));
    assert!(text.contains("pressure_buffers_allocated_total 2"));
}

#[cfg(target_os = "linux")]
#[test]
fn resident_memory_reported() {
    let m = Metrics::new().expect("metrics");
    assert!(m.resident_memory_bytes().is_some_and(|b| b > 0));
}
