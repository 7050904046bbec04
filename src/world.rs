use glam::DVec2;
use log::debug;

use crate::{
    collision::{boundary::BoundaryPolicy, queries::PickQuery},
    config::SimulationConfig,
    core::{locus::Locus, snapshot::FrameSnapshot},
    dynamics::{forces::ForceField, integrator::Integrator},
    utils::logging::ScopedTimer,
};

/// Counters describing what one step did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepMetrics {
    /// Step number after this step completed.
    pub step: u64,
    pub locus_count: usize,
    pub force_evaluations: usize,
    /// Force terms dropped because their locus vanished mid-step.
    pub skipped_terms: usize,
    pub culled: usize,
    /// A structural edit landed between the snapshot and the write phase.
    pub structure_changed: bool,
}

/// Ordered locus collection plus the write-phase half of a step.
///
/// Index 0 is the anchor whenever the configuration says the first locus is one;
/// the role follows whichever locus currently sits at index 0.
#[derive(Debug, Default, Clone)]
pub struct LocusWorld {
    loci: Vec<Locus>,
    generation: u64,
    steps: u64,
}

impl LocusWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loci(loci: Vec<Locus>) -> Self {
        Self {
            loci,
            ..Self::default()
        }
    }

    pub fn loci(&self) -> &[Locus] {
        &self.loci
    }

    pub fn get(&self, index: usize) -> Option<&Locus> {
        self.loci.get(index)
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    /// Bumped by every structural edit, including culls.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn push(&mut self, locus: Locus) -> usize {
        self.loci.push(locus);
        self.generation += 1;
        self.loci.len() - 1
    }

    pub fn pop(&mut self) -> Option<Locus> {
        let removed = self.loci.pop();
        if removed.is_some() {
            self.generation += 1;
        }
        removed
    }

    pub fn remove(&mut self, index: usize) -> Option<Locus> {
        if index >= self.loci.len() {
            return None;
        }
        self.generation += 1;
        Some(self.loci.remove(index))
    }

    pub fn clear(&mut self) {
        if !self.loci.is_empty() {
            self.generation += 1;
        }
        self.loci.clear();
    }

    /// Drag edit. Not structural, so the generation is untouched.
    pub fn set_position(&mut self, index: usize, position: DVec2) -> bool {
        match self.loci.get_mut(index) {
            Some(locus) => {
                locus.set_location(position);
                true
            }
            None => false,
        }
    }

    pub fn pick(&self, point: DVec2, radius: f64) -> Option<usize> {
        PickQuery::new(point, radius)
            .nearest(&self.loci)
            .map(|hit| hit.index)
    }

    pub fn frame(&self, config: &SimulationConfig) -> FrameSnapshot {
        FrameSnapshot::capture(self.steps, &self.loci, config.bounds, config.first_is_anchor)
    }

    /// Runs a whole step in place: forces, integration, boundary.
    pub fn step(&mut self, config: &SimulationConfig) -> StepMetrics {
        if self.loci.is_empty() {
            return self.record_empty_step();
        }
        let field = {
            let _timer = ScopedTimer::new("forces");
            ForceField::compute(&self.loci, config)
        };
        self.integrate(&field, self.generation, config)
    }

    /// Write phase for a field computed from a snapshot taken at `generation`.
    pub fn integrate(
        &mut self,
        field: &ForceField,
        generation: u64,
        config: &SimulationConfig,
    ) -> StepMetrics {
        let mut metrics = StepMetrics {
            locus_count: self.loci.len(),
            force_evaluations: field.evaluations,
            structure_changed: generation != self.generation,
            ..StepMetrics::default()
        };

        {
            let _timer = ScopedTimer::new("integrator");
            metrics.skipped_terms = Integrator::from_config(config).step(&mut self.loci, field);
        }
        {
            let _timer = ScopedTimer::new("boundary");
            metrics.culled = BoundaryPolicy::from_config(config).apply(&mut self.loci);
        }

        if metrics.structure_changed {
            debug!(
                "collection changed during force pass ({} -> {} loci), {} terms skipped",
                field.len(),
                metrics.locus_count,
                metrics.skipped_terms
            );
        }
        if metrics.culled > 0 {
            self.generation += 1;
            debug!("culled {} loci outside the viewport", metrics.culled);
        }

        self.steps += 1;
        metrics.step = self.steps;
        metrics
    }

    /// Counts a step over an empty collection; nothing moves.
    pub fn record_empty_step(&mut self) -> StepMetrics {
        self.steps += 1;
        StepMetrics {
            step: self.steps,
            ..StepMetrics::default()
        }
    }
}
