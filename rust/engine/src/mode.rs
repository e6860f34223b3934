// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classification used to color every surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    SurfaceType,
    Normal,
    Boundary,
    Construction,
    ThermalZone,
    SpaceType,
    BuildingStory,
    Data,
}

impl RenderMode {
    pub const ALL: [RenderMode; 8] = [
        RenderMode::SurfaceType,
        RenderMode::Normal,
        RenderMode::Boundary,
        RenderMode::Construction,
        RenderMode::ThermalZone,
        RenderMode::SpaceType,
        RenderMode::BuildingStory,
        RenderMode::Data,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RenderMode::SurfaceType => "Surface Type",
            RenderMode::Normal => "Normal",
            RenderMode::Boundary => "Boundary",
            RenderMode::Construction => "Construction",
            RenderMode::ThermalZone => "Thermal Zone",
            RenderMode::SpaceType => "Space Type",
            RenderMode::BuildingStory => "Building Story",
            RenderMode::Data => "Data",
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, RenderMode::Data)
    }

    /// Modes whose appearances have a distinct interior-face variant.
    pub fn has_interior_variant(&self) -> bool {
        matches!(self, RenderMode::SurfaceType | RenderMode::Normal)
    }

    /// Modes offered for a scene; Data only when it carries variables.
    pub fn available(has_data: bool) -> Vec<RenderMode> {
        Self::ALL
            .into_iter()
            .filter(|mode| has_data || !mode.is_data())
            .collect()
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RenderMode {
    type Err = String;

    /// Accepts display labels with or without spaces, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().replace(' ', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown render mode: {s}"))
    }
}
