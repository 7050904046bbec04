use glam::DVec2;
use rand::Rng;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::{EngineError, Result};

/// A point mass with position, velocity, and an immutable mass.
///
/// `dt / mass` is cached at construction for the integrator's hot path, which
/// is why the mass can never change afterwards. For the same reason there is
/// no `Deserialize`: every locus goes through [`Locus::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Locus {
    pub position: DVec2,
    pub velocity: DVec2,
    mass: f64,
    dt_over_mass: f64,
}

impl Locus {
    pub fn new(position: DVec2, velocity: DVec2, mass: f64, dt: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(EngineError::InvalidMass(mass));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(EngineError::InvalidTimeStep(dt));
        }
        Ok(Self {
            position,
            velocity,
            mass,
            dt_over_mass: dt / mass,
        })
    }

    /// A locus that starts at rest.
    pub fn at_rest(position: DVec2, mass: f64, dt: f64) -> Result<Self> {
        Self::new(position, DVec2::ZERO, mass, dt)
    }

    /// Same state, with the cache recomputed for another time step.
    pub fn with_time_step(&self, dt: f64) -> Result<Self> {
        Self::new(self.position, self.velocity, self.mass, dt)
    }

    /// Creates a locus for a user click, drawing mass and launch velocity
    /// from the configured classes. Anchors get the anchor mass and no velocity.
    pub fn spawn<R: Rng>(
        position: DVec2,
        as_anchor: bool,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        if as_anchor {
            return Self::at_rest(position, config.masses.anchor(), config.time_step);
        }

        let mut launch = || (rng.gen::<f64>() - 0.5) * rng.gen::<f64>() * config.launch_speed;
        let velocity = DVec2::new(launch(), launch());
        let mass = config.masses.ordinary().lerp(rng.gen::<f64>());
        Self::new(position, velocity, mass, config.time_step)
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn dt_over_mass(&self) -> f64 {
        self.dt_over_mass
    }

    /// Momentum half of a semi-implicit step: `v += f * dt / m`.
    ///
    /// Must run before [`Locus::update_position`] within the same step.
    pub fn apply_force(&mut self, force: DVec2) {
        self.velocity += force * self.dt_over_mass;
    }

    /// Drift half of a semi-implicit step: `x += v * dt`.
    pub fn update_position(&mut self, dt: f64) {
        self.position += self.velocity * dt;
    }

    /// Unconditional override used by drag editing; bypasses physics.
    pub fn set_location(&mut self, position: DVec2) {
        self.position = position;
    }

    pub fn set_velocity(&mut self, velocity: DVec2) {
        self.velocity = velocity;
    }
}
