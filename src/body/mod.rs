//! Rigid body tree ([`spec.md` §4.B]): a base shape plus an ordered list
//! of link shapes with per-link rigid transforms relative to the base.
//! `set_transform(T)` places the base at world transform `T` and updates
//! every link to `T * g_i`; `mink_sum(target, k)` realises the
//! Minkowski sum (`k=+1`, obstacle inflation) or difference (`k=-1`,
//! arena shrink) of `target` against every body in the tree, using the
//! closed-form semi-axis adjustment the spec licenses for ellipsoidal
//! bodies (all bodies here are superellipses/superquadrics, i.e.
//! generalized ellipsoids, so the closed form applies uniformly instead
//! of the general convolution-based Minkowski routine).

pub mod body2d;
pub mod body3d;

pub use body2d::BodyTree2D;
pub use body3d::BodyTree3D;
