use log::{log_enabled, trace, warn, Level};
use std::time::{Duration, Instant};

/// Trace-level timer around one phase of a step.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Option<Instant>,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        let start = log_enabled!(Level::Trace).then(|| {
            trace!("start {label}");
            Instant::now()
        });
        Self { label, start }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        if let Some(start) = self.start {
            trace!("end {} ({} µs)", self.label, start.elapsed().as_micros());
        }
    }
}

/// Warns when a single step overruns its wall-clock budget.
///
/// Large pairwise collections starve the refresh rate; this is the only
/// signal the engine gives about it.
pub fn warn_if_step_budget_exceeded(duration: Duration, budget_ms: f32, locus_count: usize) -> bool {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if budget_ms > 0.0 && elapsed_ms > budget_ms {
        warn!(
            "Step over {locus_count} loci exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms"
        );
        return true;
    }
    false
}
