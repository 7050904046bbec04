//! Simulation dynamics modules: gravity, force accumulation, and integration.

pub mod forces;
pub mod integrator;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use forces::{expected_evaluations, interaction_pairs, ForceField, GravityForce, PairForce};
pub use integrator::Integrator;
