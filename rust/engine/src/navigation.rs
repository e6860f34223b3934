// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Camera navigation: two rigs orbiting one target.

use bemview_geometry::{orbit_destination, Camera, CameraPose, OrbitTween, Point3, Projection};
use bemview_scene::{BoundingSphere, Color};
use tracing::debug;

use crate::config::ViewerConfig;

/// Named orbit commands from the view toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbitPreset {
    XView,
    YView,
    ZView,
    Reset,
}

impl OrbitPreset {
    /// `(theta, phi)` in degrees.
    pub fn angles(&self) -> (f64, f64) {
        match self {
            OrbitPreset::XView => (0.0, 0.0),
            OrbitPreset::YView => (-90.0, 0.0),
            OrbitPreset::ZView => (0.0, 90.0),
            OrbitPreset::Reset => (-30.0, 30.0),
        }
    }
}

/// One camera plus its in-flight transition, if any.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub camera: Camera,
    tween: Option<OrbitTween>,
}

impl CameraRig {
    fn new(camera: Camera) -> Self {
        Self {
            camera,
            tween: None,
        }
    }

    /// Starts a transition from the current pose, replacing any in flight.
    /// A zero duration snaps immediately.
    pub fn orbit_to(&mut self, destination: CameraPose, duration: f64) {
        let mut tween = OrbitTween::new(self.camera.pose, destination, duration);
        if duration > 0.0 {
            self.tween = Some(tween);
        } else {
            self.camera.pose = tween.step(0.0).0;
            self.tween = None;
        }
    }

    /// Advances the transition. Returns true on the step that completes it.
    pub fn tick(&mut self, dt: f64) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        let (pose, finished) = tween.step(dt);
        self.camera.pose = pose;
        if finished {
            self.tween = None;
        }
        finished
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }
}

/// Perspective and orthographic rigs that always share a destination.
#[derive(Debug, Clone)]
pub struct OrbitController {
    perspective: CameraRig,
    orthographic: CameraRig,
    active: Projection,
    target: Point3<f64>,
    radius: f64,
    duration: f64,
}

impl OrbitController {
    /// Both rigs framed on `bounds` and placed at the reset view.
    pub fn new(
        bounds: &BoundingSphere,
        config: &ViewerConfig,
        aspect: f64,
        active: Projection,
    ) -> Self {
        let radius = config.radius_factor * bounds.radius;
        let mut controller = Self {
            perspective: CameraRig::new(Camera::perspective(
                config.perspective_fov_deg,
                aspect,
                config.near,
                config.far,
            )),
            orthographic: CameraRig::new(Camera::orthographic(
                radius,
                aspect,
                config.near,
                config.far,
            )),
            active,
            target: bounds.center,
            radius,
            duration: config.orbit_duration_secs,
        };
        for rig in [&mut controller.perspective, &mut controller.orthographic] {
            rig.camera.pose.target = bounds.center;
        }
        let (theta, phi) = OrbitPreset::Reset.angles();
        controller.orbit(theta, phi, 0.0);
        controller
    }

    /// Orbits to `(theta, phi)` degrees. Only the active rig animates; the
    /// other snaps so switching projection never shows a stale view.
    pub fn orbit(&mut self, theta: f64, phi: f64, duration: f64) {
        let destination = orbit_destination(self.target, self.radius, theta, phi);
        debug!(theta, phi, duration, projection = ?self.active, "orbit started");
        let (active, inactive) = self.rigs_mut();
        active.orbit_to(destination, duration);
        inactive.orbit_to(destination, 0.0);
    }

    pub fn preset(&mut self, preset: OrbitPreset) {
        let (theta, phi) = preset.angles();
        self.orbit(theta, phi, self.duration);
    }

    /// Advances both rigs by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let mut finished = false;
        for rig in [&mut self.perspective, &mut self.orthographic] {
            finished |= rig.tick(dt);
        }
        if finished {
            debug!(position = ?self.active_camera().pose.position, "orbit finished");
        }
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.active = projection;
    }

    pub fn projection(&self) -> Projection {
        self.active
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        self.perspective.camera.set_aspect(aspect);
        self.orthographic.camera.set_aspect(aspect);
    }

    pub fn active_camera(&self) -> &Camera {
        &self.rig(self.active).camera
    }

    pub fn rig(&self, projection: Projection) -> &CameraRig {
        match projection {
            Projection::Perspective => &self.perspective,
            Projection::Orthographic => &self.orthographic,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.perspective.is_animating() || self.orthographic.is_animating()
    }

    /// Orbit distance from the target.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn rigs_mut(&mut self) -> (&mut CameraRig, &mut CameraRig) {
        match self.active {
            Projection::Perspective => (&mut self.perspective, &mut self.orthographic),
            Projection::Orthographic => (&mut self.orthographic, &mut self.perspective),
        }
    }
}

/// One line of the axes overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    pub from: Point3<f64>,
    pub to: Point3<f64>,
    pub color: Color,
}

/// Model axes from the origin, drawn in model orientation: X red, model Y
/// (world -Z) green, model Z (world +Y) blue.
pub fn axes(length: f64) -> [AxisLine; 3] {
    let origin = Point3::origin();
    [
        AxisLine {
            from: origin,
            to: Point3::new(length, 0.0, 0.0),
            color: Color::new(1.0, 0.0, 0.0),
        },
        AxisLine {
            from: origin,
            to: Point3::new(0.0, 0.0, -length),
            color: Color::new(0.0, 1.0, 0.0),
        },
        AxisLine {
            from: origin,
            to: Point3::new(0.0, length, 0.0),
            color: Color::new(0.0, 0.0, 1.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bemview_geometry::Lens;

    fn controller(active: Projection) -> OrbitController {
        let bounds = BoundingSphere::new(Point3::new(1.0, 2.0, 3.0), 10.0);
        OrbitController::new(&bounds, &ViewerConfig::default(), 1.5, active)
    }

    #[test]
    fn starts_at_reset_view_on_both_rigs() {
        let c = controller(Projection::Perspective);
        let expected = orbit_destination(Point3::new(1.0, 2.0, 3.0), 40.0, -30.0, 30.0);
        assert_eq!(c.rig(Projection::Perspective).camera.pose, expected);
        assert_eq!(c.rig(Projection::Orthographic).camera.pose, expected);
        assert!(!c.is_animating());
        assert_relative_eq!(c.radius(), 40.0);
    }

    #[test]
    fn orthographic_lens_spans_orbit_radius() {
        let c = controller(Projection::Perspective);
        match c.rig(Projection::Orthographic).camera.lens {
            Lens::Orthographic { height, aspect, .. } => {
                assert_relative_eq!(height, 40.0);
                assert_relative_eq!(aspect, 1.5);
            }
            other => panic!("unexpected lens {other:?}"),
        }
    }

    #[test]
    fn only_active_rig_animates() {
        let mut c = controller(Projection::Orthographic);
        c.preset(OrbitPreset::ZView);
        assert!(c.rig(Projection::Orthographic).is_animating());
        assert!(!c.rig(Projection::Perspective).is_animating());

        let destination = orbit_destination(Point3::new(1.0, 2.0, 3.0), 40.0, 0.0, 90.0);
        assert_eq!(c.rig(Projection::Perspective).camera.pose, destination);

        c.tick(0.5);
        assert_ne!(c.active_camera().pose, destination);
        c.tick(0.6);
        assert_eq!(c.active_camera().pose, destination);
        assert!(!c.is_animating());
    }

    #[test]
    fn repeated_orbit_lands_on_identical_pose() {
        let mut c = controller(Projection::Perspective);
        c.preset(OrbitPreset::XView);
        for _ in 0..7 {
            c.tick(0.13);
        }
        c.orbit(-30.0, 30.0, 1.0);
        for _ in 0..9 {
            c.tick(0.13);
        }
        let first = c.active_camera().pose;
        c.orbit(-30.0, 30.0, 1.0);
        for _ in 0..11 {
            c.tick(0.1);
        }
        let second = c.active_camera().pose;
        assert_eq!(first, second);
    }

    #[test]
    fn new_command_supersedes_transition_in_flight() {
        let mut c = controller(Projection::Perspective);
        c.preset(OrbitPreset::XView);
        c.tick(0.3);
        let midway = c.active_camera().pose;
        c.preset(OrbitPreset::YView);
        c.tick(0.0);
        assert_relative_eq!(
            (c.active_camera().pose.position - midway.position).norm(),
            0.0,
            epsilon = 1e-9
        );
        c.tick(1.0);
        let destination = orbit_destination(Point3::new(1.0, 2.0, 3.0), 40.0, -90.0, 0.0);
        assert_eq!(c.active_camera().pose, destination);
    }

    #[test]
    fn axes_use_model_orientation() {
        let [x, y, z] = axes(8.0);
        assert_eq!(x.to, Point3::new(8.0, 0.0, 0.0));
        assert_eq!(y.to, Point3::new(0.0, 0.0, -8.0));
        assert_eq!(z.to, Point3::new(0.0, 8.0, 0.0));
        assert_eq!(z.color, Color::new(0.0, 0.0, 1.0));
    }
}
