#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod domain;
pub mod error;
pub mod lib_background;
pub mod lib_mem;
pub mod metrics;
pub mod service;
pub mod size;
pub mod validation;

pub use config::{ConfigError, PressureConfig};
pub use domain::{AllocOption, Allocation, AllocationPlan, Settings};
pub use error::AllocationError;
pub use lib_background::allocate_background;
pub use lib_mem::{allocate, execute, touch_pages, PAGE_STRIDE};
pub use metrics::Metrics;
pub use service::{MemoryReport, PressureRunner};
pub use size::{Size, SizeParseError};
