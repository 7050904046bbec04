use crate::config::SimulationConfig;
use crate::core::locus::Locus;

use super::forces::ForceField;

/// Semi-implicit Euler stepper: all velocity kicks first, then all drifts.
#[derive(Debug, Clone, Copy)]
pub struct Integrator {
    pub dt: f64,
    /// Leaves index 0 where it is, even though it still accumulates velocity.
    pub pin_anchor: bool,
}

impl Integrator {
    pub fn new(dt: f64, pin_anchor: bool) -> Self {
        Self { dt, pin_anchor }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.time_step, config.anchor_is_pinned())
    }

    /// Applies the net force of each index to the locus currently at that index.
    ///
    /// Returns how many terms were dropped because the collection shrank
    /// after the field was computed.
    pub fn apply_forces(&self, loci: &mut [Locus], field: &ForceField) -> usize {
        let mut skipped = 0;
        for (index, force) in field.forces.iter().enumerate() {
            match loci.get_mut(index) {
                Some(locus) => locus.apply_force(*force),
                None => skipped += 1,
            }
        }
        skipped
    }

    pub fn advance(&self, loci: &mut [Locus]) {
        for (index, locus) in loci.iter_mut().enumerate() {
            if index == 0 && self.pin_anchor {
                continue;
            }
            locus.update_position(self.dt);
        }
    }

    /// Kick then drift. Returns the number of skipped force terms.
    pub fn step(&self, loci: &mut [Locus], field: &ForceField) -> usize {
        let skipped = self.apply_forces(loci, field);
        self.advance(loci);
        skipped
    }
}
