//! Viewport interaction: boundary handling and cursor queries.

pub mod boundary;
pub mod queries;

pub use boundary::BoundaryPolicy;
pub use queries::{PickHit, PickQuery};
