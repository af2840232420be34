//! Bridge-layer / multi-layer connection ([`spec.md` §4.G]): stitches
//! two adjacent orientation slices by fitting a tightly-fitted ellipsoid
//! per body that bounds its rotational sweep between the slices,
//! rasterising a middle-layer free decomposition from those bounding
//! shapes, and validating each candidate cross-slice edge by checking
//! that an interpolated path of configurations keeps every body centre
//! inside that middle layer.

pub mod bridge2d;
pub mod bridge3d;

pub use bridge2d::connect_bridge_2d;
pub use bridge3d::connect_bridge_3d;
