//! Core types describing loci and the snapshots handed to renderers.

pub mod locus;
pub mod snapshot;

pub use locus::Locus;
pub use snapshot::{FrameSnapshot, LocusView};
