use glam::DVec2;

use crate::config::{InteractionMode, SimulationConfig};
use crate::core::locus::Locus;

/// Trait describing a symmetric pairwise force between two loci.
pub trait PairForce: Send + Sync {
    /// Force exerted on `a` by `b`. The force on `b` is the negation.
    fn between(&self, a: &Locus, b: &Locus) -> DVec2;
}

/// Newtonian attraction with a distance floor and Plummer-style softening.
///
/// The floor bounds the `1/r²` magnitude; the softening only enters the
/// square root that normalises the direction.
#[derive(Debug, Clone, Copy)]
pub struct GravityForce {
    pub gravitational_constant: f64,
    pub softening: f64,
    pub min_distance_squared: f64,
}

impl GravityForce {
    pub fn new(gravitational_constant: f64, softening: f64, min_distance_squared: f64) -> Self {
        Self {
            gravitational_constant,
            softening,
            min_distance_squared,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(
            config.gravitational_constant,
            config.softening,
            config.min_distance_squared,
        )
    }

    /// Magnitude of the attraction for a given squared separation.
    pub fn magnitude(&self, mass_a: f64, mass_b: f64, distance_squared: f64) -> f64 {
        let distance_squared = distance_squared.max(self.min_distance_squared);
        self.gravitational_constant * mass_a * mass_b / distance_squared
    }
}

impl PairForce for GravityForce {
    fn between(&self, a: &Locus, b: &Locus) -> DVec2 {
        let delta = b.position() - a.position();
        let distance_squared = delta.length_squared().max(self.min_distance_squared);
        let force = self.magnitude(a.mass(), b.mass(), distance_squared);
        force * delta / (distance_squared + self.softening).sqrt()
    }
}

/// Index-aligned net forces for one step, computed from a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceField {
    pub forces: Vec<DVec2>,
    pub evaluations: usize,
}

impl ForceField {
    pub fn zeroed(len: usize) -> Self {
        Self {
            forces: vec![DVec2::ZERO; len],
            evaluations: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Evaluates gravity over `loci` according to the configured interaction mode.
    pub fn compute(loci: &[Locus], config: &SimulationConfig) -> Self {
        let gravity = GravityForce::from_config(config);

        #[cfg(feature = "parallel")]
        if config.parallel && config.interaction == InteractionMode::Pairwise {
            return super::parallel::pairwise_field(loci, &gravity);
        }

        Self::compute_with(loci, &gravity, config.interaction)
    }

    /// Sequential pass with an arbitrary pair force.
    pub fn compute_with<F: PairForce>(loci: &[Locus], force: &F, mode: InteractionMode) -> Self {
        let mut field = Self::zeroed(loci.len());
        for (i, j) in interaction_pairs(loci.len(), mode) {
            field.accumulate(loci, force, i, j);
        }
        field
    }

    /// Adds one pair's contribution, applied symmetrically.
    ///
    /// Out-of-range indices skip the term instead of aborting the pass.
    pub fn accumulate<F: PairForce>(&mut self, loci: &[Locus], force: &F, i: usize, j: usize) -> bool {
        let (Some(a), Some(b)) = (loci.get(i), loci.get(j)) else {
            return false;
        };
        if i >= self.forces.len() || j >= self.forces.len() {
            return false;
        }
        let f = force.between(a, b);
        self.forces[i] += f;
        self.forces[j] -= f;
        self.evaluations += 1;
        true
    }

    /// Element-wise sum used when merging per-thread partial fields.
    pub fn merge(mut self, other: Self) -> Self {
        for (lhs, rhs) in self.forces.iter_mut().zip(other.forces) {
            *lhs += rhs;
        }
        self.evaluations += other.evaluations;
        self
    }
}

/// Unordered pairs `(i, j)`, `i < j`, that take part in a step.
pub fn interaction_pairs(len: usize, mode: InteractionMode) -> impl Iterator<Item = (usize, usize)> {
    let sources = match mode {
        InteractionMode::Pairwise => len,
        InteractionMode::SingleSource => len.min(1),
    };
    (0..sources).flat_map(move |i| ((i + 1)..len).map(move |j| (i, j)))
}

/// Number of pair evaluations a step over `len` loci performs.
pub fn expected_evaluations(len: usize, mode: InteractionMode) -> usize {
    match mode {
        InteractionMode::Pairwise => len * len.saturating_sub(1) / 2,
        InteractionMode::SingleSource => len.saturating_sub(1),
    }
}
