//! Spatial primitives for lineage ordering
//!
//! Positions of tracked objects and the directions derived from them, in a
//! right-handed coordinate system. Double precision throughout, since frames
//! are built once and then reused for every comparison of a layout pass.

mod point3d;
mod vector3d;

pub use point3d::Point3D;
pub use vector3d::Vector3D;
