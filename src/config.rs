//! Configuration for the Locus Engine.
//!
//! The engine never reads ambient globals: every tunable lives in a
//! [`SimulationConfig`] value that is handed to the engine and replaced
//! wholesale when the user flips a setting. The defaults below mirror the
//! scales of an interactive pixel-space doodle.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f64 = 1e-6;

/// Newtonian gravitational constant (m³/(kg⋅s²)).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743e-11;

/// Plummer softening added to the squared distance under the direction root.
pub const DEFAULT_SOFTENING: f64 = 1e-2;

/// Floor applied to the squared separation before the `1/r²` term.
pub const DEFAULT_MIN_DISTANCE_SQUARED: f64 = 1.0;

/// Default viewport extent (in pixels).
pub const DEFAULT_VIEWPORT: [f64; 2] = [1280.0, 720.0];

/// Scale of the random launch velocity given to ordinary loci.
pub const DEFAULT_LAUNCH_SPEED: f64 = 10.5;

/// Hit radius used when picking a locus under the cursor.
pub const DEFAULT_PICK_RADIUS: f64 = 5.0;

/// Wall-clock budget for one step before a warning is logged.
pub const DEFAULT_STEP_BUDGET_MS: f32 = 16.0;

pub const DEFAULT_ANCHOR_MASS: f64 = 1e14;
pub const DEFAULT_HEAVY_ANCHOR_MASS: f64 = 1e15;

/// Lower bound shared by both ordinary mass classes.
pub const DEFAULT_PLANET_MASS_FLOOR: f64 = 1e11;
pub const DEFAULT_PLANET_MASS_SPAN: f64 = 1e12;
pub const DEFAULT_HEAVY_PLANET_MASS_SPAN: f64 = 1e14;

/// Viewport extent; valid positions lie in `[0, width) × [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT[0],
            height: DEFAULT_VIEWPORT[1],
        }
    }
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Half-open containment test used by culling and visibility.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x < self.width && y >= 0.0 && y < self.height
    }
}

/// What happens to a locus that leaves the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Reflect the outward velocity component.
    #[default]
    Bounce,
    /// Remove the locus from the collection.
    Cull,
    /// Leave it alone; it simply stops being visible.
    Open,
}

/// Which pairs take part in the force pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Every unordered pair, O(n²).
    #[default]
    Pairwise,
    /// Only pairs involving index 0, O(n).
    SingleSource,
}

/// Half-open mass interval `[min, max)` sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassRange {
    pub min: f64,
    pub max: f64,
}

impl MassRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Maps a unit sample in `[0, 1)` onto the range.
    pub fn lerp(&self, unit: f64) -> f64 {
        self.min + unit * (self.max - self.min)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "{name} must have a positive finite minimum, got {}",
                self.min
            )));
        }
        if self.max < self.min {
            return Err(EngineError::InvalidConfig(format!(
                "{name} maximum {} is below its minimum {}",
                self.max, self.min
            )));
        }
        Ok(())
    }
}

/// Mass classes consulted only when a locus is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MassClasses {
    pub anchor_mass: f64,
    pub heavy_anchor_mass: f64,
    pub heavy_anchor: bool,
    pub planet_mass: MassRange,
    pub heavy_planet_mass: MassRange,
    pub heavy_planets: bool,
}

impl Default for MassClasses {
    fn default() -> Self {
        Self {
            anchor_mass: DEFAULT_ANCHOR_MASS,
            heavy_anchor_mass: DEFAULT_HEAVY_ANCHOR_MASS,
            heavy_anchor: false,
            planet_mass: MassRange::new(
                DEFAULT_PLANET_MASS_FLOOR,
                DEFAULT_PLANET_MASS_FLOOR + DEFAULT_PLANET_MASS_SPAN,
            ),
            heavy_planet_mass: MassRange::new(
                DEFAULT_PLANET_MASS_FLOOR,
                DEFAULT_PLANET_MASS_FLOOR + DEFAULT_HEAVY_PLANET_MASS_SPAN,
            ),
            heavy_planets: false,
        }
    }
}

impl MassClasses {
    pub fn anchor(&self) -> f64 {
        if self.heavy_anchor {
            self.heavy_anchor_mass
        } else {
            self.anchor_mass
        }
    }

    pub fn ordinary(&self) -> MassRange {
        if self.heavy_planets {
            self.heavy_planet_mass
        } else {
            self.planet_mass
        }
    }
}

/// Read-only simulation settings, re-read by the engine at the top of every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub time_step: f64,
    pub gravitational_constant: f64,
    pub softening: f64,
    pub min_distance_squared: f64,
    pub bounds: Bounds,
    pub boundary: BoundaryMode,
    pub first_is_anchor: bool,
    pub anchor_immobile: bool,
    pub interaction: InteractionMode,
    pub masses: MassClasses,
    pub launch_speed: f64,
    pub pick_radius: f64,
    pub seed: Option<u64>,
    pub parallel: bool,
    pub step_budget_ms: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: DEFAULT_TIME_STEP,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            softening: DEFAULT_SOFTENING,
            min_distance_squared: DEFAULT_MIN_DISTANCE_SQUARED,
            bounds: Bounds::default(),
            boundary: BoundaryMode::default(),
            first_is_anchor: true,
            anchor_immobile: true,
            interaction: InteractionMode::default(),
            masses: MassClasses::default(),
            launch_speed: DEFAULT_LAUNCH_SPEED,
            pick_radius: DEFAULT_PICK_RADIUS,
            seed: None,
            parallel: false,
            step_budget_ms: DEFAULT_STEP_BUDGET_MS,
        }
    }
}

impl SimulationConfig {
    /// True when index 0 must never have its position advanced.
    pub fn anchor_is_pinned(&self) -> bool {
        self.first_is_anchor && self.anchor_immobile
    }

    /// Rejects settings the engine cannot run with. Nothing is corrected in place.
    pub fn validate(&self) -> Result<()> {
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        if !self.gravitational_constant.is_finite() || self.gravitational_constant < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "gravitational constant must be non-negative, got {}",
                self.gravitational_constant
            )));
        }
        if !self.softening.is_finite() || self.softening < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "softening must be non-negative, got {}",
                self.softening
            )));
        }
        if !self.min_distance_squared.is_finite() || self.min_distance_squared <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "minimum squared distance must be positive, got {}",
                self.min_distance_squared
            )));
        }
        let Bounds { width, height } = self.bounds;
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "viewport must have a positive extent, got {width} x {height}"
            )));
        }
        if !self.masses.anchor_mass.is_finite() || self.masses.anchor_mass <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "anchor mass must be positive, got {}",
                self.masses.anchor_mass
            )));
        }
        if !self.masses.heavy_anchor_mass.is_finite() || self.masses.heavy_anchor_mass <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "heavy anchor mass must be positive, got {}",
                self.masses.heavy_anchor_mass
            )));
        }
        self.masses.planet_mass.validate("planet mass range")?;
        self.masses.heavy_planet_mass.validate("heavy planet mass range")?;
        if !self.launch_speed.is_finite() || self.launch_speed < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "launch speed must be non-negative, got {}",
                self.launch_speed
            )));
        }
        if !self.pick_radius.is_finite() || self.pick_radius < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "pick radius must be non-negative, got {}",
                self.pick_radius
            )));
        }
        Ok(())
    }
}
