//! Utility helpers: trace logging and step profiling.

pub mod logging;
pub mod profiling;

pub use profiling::StepProfiler;
