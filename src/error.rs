//! Error types for the Locus Engine.
//!
//! This module provides a unified error type [`EngineError`] and a convenient [`Result`] alias.

use std::fmt;

/// Main error type for the engine.
///
/// Only precondition violations surface here. Numerical singularities and
/// transient index races are absorbed inside the step loop.
#[derive(Debug)]
pub enum EngineError {
    /// A locus was created with a non-positive or non-finite mass.
    InvalidMass(f64),
    /// A locus was created with a non-positive or non-finite time step.
    InvalidTimeStep(f64),
    /// The configuration failed validation.
    InvalidConfig(String),
    /// A replacement configuration tried to change the fixed time step.
    TimeStepChanged { current: f64, requested: f64 },
    /// The simulation thread could not be spawned.
    ThreadSpawn(std::io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidMass(mass) => write!(f, "Invalid locus mass: {mass}"),
            Self::InvalidTimeStep(dt) => write!(f, "Invalid time step: {dt}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::TimeStepChanged { current, requested } => write!(
                f,
                "Time step is fixed at {current} for this engine, cannot switch to {requested}"
            ),
            Self::ThreadSpawn(err) => write!(f, "Failed to spawn simulation thread: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ThreadSpawn(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenient Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
