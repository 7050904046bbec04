use crate::config::{BoundaryMode, Bounds, SimulationConfig};
use crate::core::locus::Locus;

/// Reflects or culls loci against the viewport after positions move.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryPolicy {
    pub mode: BoundaryMode,
    pub bounds: Bounds,
}

impl BoundaryPolicy {
    pub fn new(mode: BoundaryMode, bounds: Bounds) -> Self {
        Self { mode, bounds }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.boundary, config.bounds)
    }

    /// Applies the policy and returns how many loci were culled.
    pub fn apply(&self, loci: &mut Vec<Locus>) -> usize {
        match self.mode {
            BoundaryMode::Bounce => {
                for locus in loci.iter_mut() {
                    self.bounce(locus);
                }
                0
            }
            BoundaryMode::Cull => self.cull(loci),
            BoundaryMode::Open => 0,
        }
    }

    /// Negates a velocity component only while it still points out of the
    /// viewport, so one crossing flips it once.
    pub fn bounce(&self, locus: &mut Locus) -> bool {
        let mut flipped = false;
        let (x, y) = (locus.position.x, locus.position.y);

        if (x > self.bounds.width && locus.velocity.x > 0.0) || (x < 0.0 && locus.velocity.x < 0.0) {
            locus.velocity.x = -locus.velocity.x;
            flipped = true;
        }
        if (y > self.bounds.height && locus.velocity.y > 0.0) || (y < 0.0 && locus.velocity.y < 0.0) {
            locus.velocity.y = -locus.velocity.y;
            flipped = true;
        }
        flipped
    }

    pub fn cull(&self, loci: &mut Vec<Locus>) -> usize {
        let before = loci.len();
        loci.retain(|locus| self.bounds.contains(locus.position.x, locus.position.y));
        before - loci.len()
    }
}
