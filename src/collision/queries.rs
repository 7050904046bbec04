use glam::DVec2;

use crate::core::locus::Locus;

/// Result of a pick against the collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub index: usize,
    pub distance: f64,
}

/// Cursor hit test used by drag and remove editing.
#[derive(Debug, Clone, Copy)]
pub struct PickQuery {
    pub point: DVec2,
    pub radius: f64,
}

impl PickQuery {
    pub fn new(point: DVec2, radius: f64) -> Self {
        Self { point, radius }
    }

    /// Every locus within `radius`, nearest first.
    pub fn cast(&self, loci: &[Locus]) -> Vec<PickHit> {
        let radius_squared = self.radius * self.radius;
        let mut hits: Vec<PickHit> = loci
            .iter()
            .enumerate()
            .filter_map(|(index, locus)| {
                let distance_squared = locus.position().distance_squared(self.point);
                (distance_squared <= radius_squared).then(|| PickHit {
                    index,
                    distance: distance_squared.sqrt(),
                })
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    pub fn nearest(&self, loci: &[Locus]) -> Option<PickHit> {
        self.cast(loci).into_iter().next()
    }
}
