// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration loaded from environment variables.

use std::str::FromStr;

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Legend raster width in pixels.
    pub legend_width: u32,
    /// Legend raster height in pixels.
    pub legend_height: u32,
    /// Duration of animated orbit presets in seconds.
    pub orbit_duration_secs: f64,
    /// Orbit radius and axis length as a multiple of the scene radius.
    pub radius_factor: f64,
    /// Vertical field of view of the perspective rig in degrees.
    pub perspective_fov_deg: f64,
    /// Near clip distance for both rigs.
    pub near: f64,
    /// Far clip distance for both rigs.
    pub far: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            legend_width: 256,
            legend_height: 40,
            orbit_duration_secs: 1.0,
            radius_factor: 4.0,
            perspective_fov_deg: 45.0,
            near: 1.0,
            far: 5000.0,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            legend_width: parse_or(lookup("BEMVIEW_LEGEND_WIDTH"), defaults.legend_width),
            legend_height: parse_or(lookup("BEMVIEW_LEGEND_HEIGHT"), defaults.legend_height),
            orbit_duration_secs: parse_or(
                lookup("BEMVIEW_ORBIT_DURATION_SECS"),
                defaults.orbit_duration_secs,
            ),
            radius_factor: parse_or(lookup("BEMVIEW_RADIUS_FACTOR"), defaults.radius_factor),
            perspective_fov_deg: parse_or(
                lookup("BEMVIEW_PERSPECTIVE_FOV_DEG"),
                defaults.perspective_fov_deg,
            ),
            near: parse_or(lookup("BEMVIEW_NEAR"), defaults.near),
            far: parse_or(lookup("BEMVIEW_FAR"), defaults.far),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
