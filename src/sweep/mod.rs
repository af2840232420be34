//! Sweep-line cell decomposition ([`spec.md` §4.E]): rasterises a layer's
//! boundaries into free segments along a sweep coordinate, then enhances
//! the decomposition by inserting pinch-vertex columns at touching cells
//! so the resulting cells are safely traversable by straight edges.

pub mod decompose;
pub mod segment;

pub use decompose::{compute_free_segment_2d, compute_free_segment_3d, enhance_decomposition, enhance_decomposition_3d};
pub use segment::{FreeSegment2D, FreeSegment3D};
