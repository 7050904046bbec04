use std::time::{Duration, Instant};

/// Wall-clock timings of the phases of the most recent step.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfiler {
    pub snapshot_time: Duration,
    pub force_time: Duration,
    pub integrate_time: Duration,
    pub total_step_time: Duration,

    pub locus_count: usize,
    pub force_evaluations: usize,
}

impl StepProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self) {
        let total_us = self.total_step_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "step: {} loci, {} pair evaluations, {:.3} ms total \
             (snapshot {:.1}%, forces {:.1}%, integrate {:.1}%)",
            self.locus_count,
            self.force_evaluations,
            self.total_step_time.as_secs_f32() * 1000.0,
            (self.snapshot_time.as_micros() as f32 / total_us) * 100.0,
            (self.force_time.as_micros() as f32 / total_us) * 100.0,
            (self.integrate_time.as_micros() as f32 / total_us) * 100.0,
        );
    }
}

/// Adds the elapsed time of its scope into a profiler slot.
pub struct ScopedTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
