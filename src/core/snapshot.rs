use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::Bounds;

use super::locus::Locus;

/// Render-facing copy of one locus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocusView {
    pub position: DVec2,
    pub velocity: DVec2,
    pub mass: f64,
    pub is_anchor: bool,
    /// Whether the locus currently lies inside the viewport.
    pub in_view: bool,
}

/// Point-in-time copy of the collection handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub step: u64,
    pub bounds: Bounds,
    pub loci: Vec<LocusView>,
}

impl FrameSnapshot {
    pub fn capture(step: u64, loci: &[Locus], bounds: Bounds, first_is_anchor: bool) -> Self {
        let loci = loci
            .iter()
            .enumerate()
            .map(|(index, locus)| LocusView {
                position: locus.position(),
                velocity: locus.velocity(),
                mass: locus.mass(),
                is_anchor: first_is_anchor && index == 0,
                in_view: bounds.contains(locus.position().x, locus.position().y),
            })
            .collect();

        Self { step, bounds, loci }
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    pub fn anchor(&self) -> Option<&LocusView> {
        self.loci.first().filter(|view| view.is_anchor)
    }

    /// Loci the renderer should actually draw.
    pub fn visible(&self) -> impl Iterator<Item = &LocusView> {
        self.loci.iter().filter(|view| view.in_view)
    }
}
