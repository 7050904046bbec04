use rayon::prelude::*;

use crate::core::locus::Locus;

use super::forces::{ForceField, PairForce};

/// Below this many loci the rayon fan-out costs more than it saves.
pub const PARALLEL_THRESHOLD: usize = 64;

/// Pairwise force pass split by source row across the Rayon pool.
///
/// Each worker folds its rows into a private field; the partial fields are
/// summed afterwards, so every unordered pair is still evaluated exactly once.
pub fn pairwise_field<F: PairForce>(loci: &[Locus], force: &F) -> ForceField {
    let len = loci.len();
    if len < PARALLEL_THRESHOLD {
        return ForceField::compute_with(loci, force, crate::config::InteractionMode::Pairwise);
    }

    (0..len)
        .into_par_iter()
        .fold(
            || ForceField::zeroed(len),
            |mut field, i| {
                for j in (i + 1)..len {
                    field.accumulate(loci, force, i, j);
                }
                field
            },
        )
        .reduce(|| ForceField::zeroed(len), ForceField::merge)
}
