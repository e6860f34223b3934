// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orbit transitions
//!
//! Camera moves between orbit presets are interpolated in spherical
//! coordinates around the look-at target rather than in Cartesian space, so
//! the camera swings around the model instead of cutting through it.

use nalgebra::{Point3, Vector3};

use crate::camera::CameraPose;

/// Up vector used for the straight-overhead view.
///
/// A true vertical up would be parallel to the view direction.
const OVERHEAD_UP: Vector3<f64> = Vector3::new(0.0, 1.0, -0.01);

/// Cubic ease-in-out over `[0, 1]`.
#[inline]
pub fn ease_in_out_cubic(p: f64) -> f64 {
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// Spherical coordinates of an offset vector.
///
/// `theta` is measured from the +Z axis (`acos(z / r)`) and `phi` is the
/// azimuth in the XY plane (`atan2(y, x)`), both in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    pub theta: f64,
    pub phi: f64,
}

impl Spherical {
    pub fn from_offset(offset: &Vector3<f64>) -> Self {
        let radius = offset.norm();
        if radius < f64::EPSILON {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: (offset.z / radius).clamp(-1.0, 1.0).acos(),
            phi: offset.y.atan2(offset.x),
        }
    }

    pub fn to_offset(&self) -> Vector3<f64> {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let (sin_p, cos_p) = self.phi.sin_cos();
        Vector3::new(
            self.radius * sin_t * cos_p,
            self.radius * sin_t * sin_p,
            self.radius * cos_t,
        )
    }

    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            radius: lerp(self.radius, other.radius, t),
            theta: lerp(self.theta, other.theta, t),
            phi: lerp(self.phi, other.phi, t),
        }
    }
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Analytic camera pose for an orbit command.
///
/// `theta_deg` is the azimuth and `phi_deg` the elevation, in degrees. The
/// camera ends `radius` away from `target` with zoom reset to 1.
pub fn orbit_destination(
    target: Point3<f64>,
    radius: f64,
    theta_deg: f64,
    phi_deg: f64,
) -> CameraPose {
    let (sin_t, cos_t) = theta_deg.to_radians().sin_cos();
    let (sin_p, cos_p) = phi_deg.to_radians().sin_cos();
    let offset = Vector3::new(
        radius * cos_t * cos_p,
        radius * sin_p,
        -radius * sin_t * cos_p,
    );
    CameraPose {
        position: target + offset,
        target,
        up: if phi_deg == 90.0 {
            OVERHEAD_UP
        } else {
            Vector3::y()
        },
        zoom: 1.0,
    }
}

/// An in-flight transition between two camera poses.
///
/// Driven by the frame loop through [`OrbitTween::step`]. Superseding a
/// transition is done by building a new one from the current pose.
#[derive(Debug, Clone)]
pub struct OrbitTween {
    from: CameraPose,
    to: CameraPose,
    start: Spherical,
    end: Spherical,
    duration: f64,
    elapsed: f64,
}

impl OrbitTween {
    pub fn new(from: CameraPose, to: CameraPose, duration: f64) -> Self {
        Self {
            start: Spherical::from_offset(&(from.position - from.target)),
            end: Spherical::from_offset(&(to.position - to.target)),
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn destination(&self) -> &CameraPose {
        &self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    /// Advance by `dt` seconds and return the pose to display plus whether
    /// the transition has completed.
    ///
    /// The final step returns the destination exactly, never an
    /// interpolated sample.
    pub fn step(&mut self, dt: f64) -> (CameraPose, bool) {
        self.elapsed += dt.max(0.0);
        if self.is_finished() {
            return (self.to, true);
        }

        let t = ease_in_out_cubic(self.progress());
        let target = self.from.target + (self.to.target - self.from.target) * t;
        let offset = self.start.lerp(&self.end, t).to_offset();
        let pose = CameraPose {
            position: target + offset,
            target,
            up: self.from.up.lerp(&self.to.up, t),
            zoom: lerp(self.from.zoom, self.to.zoom, t),
        };
        (pose, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ease_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert_relative_eq!(ease_in_out_cubic(0.25), 0.0625);
        assert_relative_eq!(
            ease_in_out_cubic(0.3) + ease_in_out_cubic(0.7),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn spherical_reconstructs_offset() {
        let offset = Vector3::new(3.0, -4.0, 12.0);
        let s = Spherical::from_offset(&offset);
        assert_relative_eq!(s.radius, 13.0);
        assert_relative_eq!(s.to_offset(), offset, epsilon = 1e-9);
    }

    #[test]
    fn spherical_of_zero_offset_is_zero() {
        let s = Spherical::from_offset(&Vector3::zeros());
        assert_eq!(s.radius, 0.0);
        assert_eq!(s.to_offset(), Vector3::zeros());
    }

    #[test]
    fn reset_destination_follows_azimuth_and_elevation() {
        let target = Point3::new(1.0, 2.0, 3.0);
        let pose = orbit_destination(target, 10.0, -30.0, 30.0);
        let c30 = 30f64.to_radians().cos();
        assert_relative_eq!(pose.position.x, 1.0 + 10.0 * c30 * c30, epsilon = 1e-9);
        assert_relative_eq!(pose.position.y, 2.0 + 5.0, epsilon = 1e-9);
        assert_relative_eq!(pose.position.z, 3.0 + 5.0 * c30, epsilon = 1e-9);
        assert_eq!(pose.target, target);
        assert_eq!(pose.up, Vector3::y());
        assert_eq!(pose.zoom, 1.0);
    }

    #[test]
    fn overhead_destination_nudges_up() {
        let pose = orbit_destination(Point3::origin(), 10.0, 0.0, 90.0);
        assert_eq!(pose.up, OVERHEAD_UP);
        assert_relative_eq!(pose.position.y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_duration_snaps_immediately() {
        let from = CameraPose::new(Point3::new(0.0, 0.0, 5.0), Point3::origin());
        let to = orbit_destination(Point3::origin(), 20.0, 0.0, 0.0);
        let mut tween = OrbitTween::new(from, to, 0.0);
        let (pose, finished) = tween.step(0.0);
        assert!(finished);
        assert_eq!(pose, to);
    }

    #[test]
    fn intermediate_steps_interpolate_radius() {
        let from = orbit_destination(Point3::origin(), 10.0, 0.0, 0.0);
        let to = orbit_destination(Point3::origin(), 20.0, -90.0, 0.0);
        let mut tween = OrbitTween::new(from, to, 1.0);

        let (pose, finished) = tween.step(0.5);
        assert!(!finished);
        assert_relative_eq!(pose.position.coords.norm(), 15.0, epsilon = 1e-9);

        let (pose, finished) = tween.step(0.75);
        assert!(finished);
        assert_eq!(pose, to);
    }

    #[test]
    fn tween_carries_target_and_zoom() {
        let mut from = CameraPose::new(Point3::new(0.0, 0.0, 10.0), Point3::origin());
        from.zoom = 3.0;
        let to = orbit_destination(Point3::new(2.0, 0.0, 0.0), 10.0, 0.0, 0.0);
        let mut tween = OrbitTween::new(from, to, 2.0);
        let (pose, _) = tween.step(1.0);
        assert_relative_eq!(pose.target.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(pose.zoom, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn repeated_orbit_is_bit_identical() {
        let start = CameraPose::new(Point3::new(7.0, 3.0, -2.0), Point3::origin());
        let to = orbit_destination(Point3::origin(), 40.0, -30.0, 30.0);

        let run = |from: CameraPose| {
            let mut tween = OrbitTween::new(from, to, 1.0);
            loop {
                let (pose, finished) = tween.step(1.0 / 60.0);
                if finished {
                    return pose;
                }
            }
        };

        let first = run(start);
        let second = run(first);
        assert_eq!(first, second);
        assert_eq!(first.position.x.to_bits(), second.position.x.to_bits());
    }
}
