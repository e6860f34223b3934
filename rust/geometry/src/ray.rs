// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pick rays and ray/triangle intersection.

use nalgebra::{Point3, Vector3};

use crate::mesh::Mesh;

const PARALLEL_EPSILON: f64 = 1e-12;

/// A half-line with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Returns the distance along the ray to the hit point. Both faces of the
/// triangle are hit; hits behind the ray origin are ignored.
pub fn intersect_triangle(
    ray: &Ray,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < PARALLEL_EPSILON {
        return None; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > PARALLEL_EPSILON).then_some(t)
}

/// Nearest intersection distance between a ray and any triangle of a mesh.
pub fn intersect_mesh(ray: &Ray, mesh: &Mesh) -> Option<f64> {
    mesh.triangles()
        .filter_map(|[v0, v1, v2]| intersect_triangle(ray, &v0, &v1, &v2))
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> [Point3<f64>; 3] {
        [
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn hits_front_face() {
        let [a, b, c] = triangle();
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -2.0));
        assert_relative_eq!(intersect_triangle(&ray, &a, &b, &c).unwrap(), 5.0);
    }

    #[test]
    fn hits_back_face() {
        let [a, b, c] = triangle();
        let ray = Ray::new(Point3::new(0.0, 0.0, -3.0), Vector3::z());
        assert_relative_eq!(intersect_triangle(&ray, &a, &b, &c).unwrap(), 3.0);
    }

    #[test]
    fn misses_outside_and_behind() {
        let [a, b, c] = triangle();
        let outside = Ray::new(Point3::new(5.0, 5.0, 5.0), -Vector3::z());
        assert!(intersect_triangle(&outside, &a, &b, &c).is_none());

        let behind = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::z());
        assert!(intersect_triangle(&behind, &a, &b, &c).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let [a, b, c] = triangle();
        let ray = Ray::new(Point3::new(-5.0, 0.0, 0.0), Vector3::x());
        assert!(intersect_triangle(&ray, &a, &b, &c).is_none());
    }

    #[test]
    fn mesh_returns_nearest_hit() {
        let mut mesh = Mesh::new();
        for z in [0.0, 2.0] {
            let base = mesh.vertex_count() as u32;
            for [x, y] in [[-1.0, -1.0], [1.0, -1.0], [0.0, 1.0]] {
                mesh.add_vertex(Point3::new(x, y, z));
            }
            mesh.add_triangle(base, base + 1, base + 2);
        }
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), -Vector3::z());
        assert_relative_eq!(intersect_mesh(&ray, &mesh).unwrap(), 8.0);
    }
}
