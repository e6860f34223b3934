// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BemView Geometry
//!
//! Surface meshes, camera rigs and the orbit tween used by the viewer,
//! built on nalgebra. World space is Y-up; OpenStudio coordinates
//! `(x, y, z)` map to world `(x, z, -y)`.

pub mod camera;
pub mod error;
pub mod mesh;
pub mod orbit;
pub mod ray;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use camera::{screen_to_ndc, Camera, CameraPose, Lens, Projection};
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use orbit::{ease_in_out_cubic, orbit_destination, OrbitTween, Spherical};
pub use ray::{intersect_mesh, intersect_triangle, Ray};

/// Converts an OpenStudio coordinate triple to a world-space point.
#[inline]
pub fn from_openstudio(x: f64, y: f64, z: f64) -> Point3<f64> {
    Point3::new(x, z, -y)
}
