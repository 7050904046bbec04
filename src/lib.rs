//! Locus Engine – gravitational simulation core for interactive doodles.
//!
//! Point masses ("loci") attract each other inside a bounded 2D viewport
//! while a user keeps adding, dragging, and removing them. The crate owns
//! the physics step, its numerical stabilisers, the boundary policy, and the
//! locking protocol that lets a background loop share the collection with an
//! input thread. Windowing and drawing stay with the caller.

pub mod collision;
pub mod config;
pub mod core;
pub mod dynamics;
pub mod engine;
pub mod error;
pub mod utils;
pub mod world;

pub use glam::DVec2;

pub use collision::{
    boundary::BoundaryPolicy,
    queries::{PickHit, PickQuery},
};
pub use config::{BoundaryMode, Bounds, InteractionMode, MassClasses, MassRange, SimulationConfig};
pub use crate::core::{
    locus::Locus,
    snapshot::{FrameSnapshot, LocusView},
};
pub use dynamics::{
    forces::{ForceField, GravityForce, PairForce},
    integrator::Integrator,
};
pub use engine::{EngineState, NoopRefresh, RefreshSink, SimulationEngine};
pub use error::{EngineError, Result};
pub use utils::profiling::StepProfiler;
pub use world::{LocusWorld, StepMetrics};
