// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera rigs: pose, lens, view/projection matrices and pick rays.

use nalgebra::{Isometry3, Matrix4, Orthographic3, Perspective3, Point2, Point3, Vector3};

use crate::ray::Ray;

/// Which lens a rig uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    Perspective,
    Orthographic,
}

/// Where a camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3<f64>,
    /// Look-at point, shared with the orbit controls.
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub zoom: f64,
}

impl CameraPose {
    pub fn new(position: Point3<f64>, target: Point3<f64>) -> Self {
        Self {
            position,
            target,
            up: Vector3::y(),
            zoom: 1.0,
        }
    }
}

/// Projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lens {
    Perspective {
        fov_y_deg: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
    /// `height` is the full frustum height at zoom 1.
    Orthographic {
        height: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
}

/// A camera rig: lens plus pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub lens: Lens,
    pub pose: CameraPose,
}

impl Camera {
    pub fn perspective(fov_y_deg: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            lens: Lens::Perspective {
                fov_y_deg,
                aspect,
                near,
                far,
            },
            pose: CameraPose::new(Point3::new(0.0, 0.0, 1.0), Point3::origin()),
        }
    }

    pub fn orthographic(height: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            lens: Lens::Orthographic {
                height,
                aspect,
                near,
                far,
            },
            pose: CameraPose::new(Point3::new(0.0, 0.0, 1.0), Point3::origin()),
        }
    }

    pub fn projection(&self) -> Projection {
        match self.lens {
            Lens::Perspective { .. } => Projection::Perspective,
            Lens::Orthographic { .. } => Projection::Orthographic,
        }
    }

    /// Update the viewport aspect ratio.
    pub fn set_aspect(&mut self, new_aspect: f64) {
        match &mut self.lens {
            Lens::Perspective { aspect, .. } | Lens::Orthographic { aspect, .. } => {
                *aspect = new_aspect
            }
        }
    }

    /// World-to-view transform.
    pub fn view(&self) -> Isometry3<f64> {
        Isometry3::look_at_rh(&self.pose.position, &self.pose.target, &self.pose.up)
    }

    /// Projection matrix with zoom applied.
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.projector() {
            Projector::Perspective(p) => p.to_homogeneous(),
            Projector::Orthographic(o) => o.to_homogeneous(),
        }
    }

    /// Ray through a point given in normalized device coordinates.
    ///
    /// Perspective rays start at the eye; orthographic rays start on the near
    /// plane and run along the view direction.
    pub fn ray_from_ndc(&self, ndc: Point2<f64>) -> Ray {
        let camera_to_world = self.view().inverse();
        match self.projector() {
            Projector::Perspective(p) => {
                let in_view = p.unproject_point(&Point3::new(ndc.x, ndc.y, 0.5));
                let through = camera_to_world.transform_point(&in_view);
                Ray::new(self.pose.position, through - self.pose.position)
            }
            Projector::Orthographic(o) => {
                let in_view = o.unproject_point(&Point3::new(ndc.x, ndc.y, -1.0));
                let origin = camera_to_world.transform_point(&in_view);
                let direction = camera_to_world.transform_vector(&-Vector3::z());
                Ray::new(origin, direction)
            }
        }
    }

    fn projector(&self) -> Projector {
        let zoom = self.pose.zoom;
        match self.lens {
            Lens::Perspective {
                fov_y_deg,
                aspect,
                near,
                far,
            } => {
                let half = (fov_y_deg.to_radians() / 2.0).tan() / zoom;
                Projector::Perspective(Perspective3::new(aspect, 2.0 * half.atan(), near, far))
            }
            Lens::Orthographic {
                height,
                aspect,
                near,
                far,
            } => {
                let half_h = height / 2.0 / zoom;
                let half_w = half_h * aspect;
                Projector::Orthographic(Orthographic3::new(
                    -half_w, half_w, -half_h, half_h, near, far,
                ))
            }
        }
    }
}

enum Projector {
    Perspective(Perspective3<f64>),
    Orthographic(Orthographic3<f64>),
}

/// Converts a pixel position to normalized device coordinates.
///
/// Screen y grows downward, NDC y grows upward.
#[inline]
pub fn screen_to_ndc(x: f64, y: f64, width: f64, height: f64) -> Point2<f64> {
    Point2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn looking_down_z(mut camera: Camera) -> Camera {
        camera.pose = CameraPose::new(Point3::new(0.0, 0.0, 10.0), Point3::origin());
        camera
    }

    #[test]
    fn screen_corners_map_to_ndc() {
        let top_left = screen_to_ndc(0.0, 0.0, 800.0, 600.0);
        assert_relative_eq!(top_left.x, -1.0);
        assert_relative_eq!(top_left.y, 1.0);

        let center = screen_to_ndc(400.0, 300.0, 800.0, 600.0);
        assert_relative_eq!(center.x, 0.0);
        assert_relative_eq!(center.y, 0.0);
    }

    #[test]
    fn perspective_center_ray_points_at_target() {
        let camera = looking_down_z(Camera::perspective(45.0, 1.5, 1.0, 5000.0));
        let ray = camera.ray_from_ndc(Point2::origin());
        assert_relative_eq!(ray.origin, Point3::new(0.0, 0.0, 10.0), epsilon = 1e-9);
        assert_relative_eq!(ray.direction, -Vector3::z(), epsilon = 1e-9);
    }

    #[test]
    fn perspective_edge_ray_matches_fov() {
        let camera = looking_down_z(Camera::perspective(90.0, 1.0, 1.0, 100.0));
        let ray = camera.ray_from_ndc(Point2::new(0.0, 1.0));
        // 45 degree half-angle: the ray rises one unit per unit travelled
        assert_relative_eq!(ray.direction.y, -ray.direction.z, epsilon = 1e-9);
    }

    #[test]
    fn orthographic_rays_are_parallel() {
        let camera = looking_down_z(Camera::orthographic(4.0, 2.0, 1.0, 100.0));
        let right_edge = camera.ray_from_ndc(Point2::new(1.0, 0.0));
        assert_relative_eq!(right_edge.origin.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(right_edge.origin.z, 9.0, epsilon = 1e-9);
        assert_relative_eq!(right_edge.direction, -Vector3::z(), epsilon = 1e-9);
    }

    #[test]
    fn orthographic_zoom_shrinks_frustum() {
        let mut camera = looking_down_z(Camera::orthographic(4.0, 1.0, 1.0, 100.0));
        camera.pose.zoom = 2.0;
        let top = camera.ray_from_ndc(Point2::new(0.0, 1.0));
        assert_relative_eq!(top.origin.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn set_aspect_updates_lens() {
        let mut camera = Camera::perspective(45.0, 1.0, 1.0, 10.0);
        camera.set_aspect(2.0);
        assert!(matches!(camera.lens, Lens::Perspective { aspect, .. } if aspect == 2.0));
        assert_eq!(camera.projection(), Projection::Perspective);
    }
}
