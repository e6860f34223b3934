// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Info readout for the selected surface.

use bemview_scene::SurfaceMetadata;
use serde::Serialize;

use crate::binder::DataSample;
use crate::mode::RenderMode;

/// Offset of the readout from the pick point, in pixels.
const ANCHOR_OFFSET: (f64, f64) = (10.0, -10.0);

/// Mode-specific part of the readout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReadoutBody {
    SurfaceType {
        surface_type: String,
        space_name: Option<String>,
    },
    Boundary {
        outside_boundary_condition: Option<String>,
        sun_exposure: Option<String>,
        wind_exposure: Option<String>,
    },
    Construction {
        construction_name: Option<String>,
    },
    ThermalZone {
        thermal_zone_name: Option<String>,
    },
    SpaceType {
        space_type_name: Option<String>,
    },
    BuildingStory {
        building_story_name: Option<String>,
    },
    /// `sample` is absent when the surface has no value at the interval.
    Data { sample: Option<DataSample> },
}

/// Readout payload for external display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoReadout {
    pub name: String,
    pub body: ReadoutBody,
    /// Screen position of the readout's corner.
    pub anchor: (f64, f64),
}

impl InfoReadout {
    /// Builds the readout for `mode`. `sample` is only read in Data mode.
    pub fn new(
        mode: RenderMode,
        metadata: &SurfaceMetadata,
        sample: Option<&DataSample>,
        pick: (f64, f64),
    ) -> Self {
        let m = metadata.clone();
        let body = match mode {
            RenderMode::SurfaceType | RenderMode::Normal => ReadoutBody::SurfaceType {
                surface_type: m.surface_type,
                space_name: m.space_name,
            },
            RenderMode::Boundary => ReadoutBody::Boundary {
                outside_boundary_condition: m.outside_boundary_condition,
                sun_exposure: m.sun_exposure,
                wind_exposure: m.wind_exposure,
            },
            RenderMode::Construction => ReadoutBody::Construction {
                construction_name: m.construction_name,
            },
            RenderMode::ThermalZone => ReadoutBody::ThermalZone {
                thermal_zone_name: m.thermal_zone_name,
            },
            RenderMode::SpaceType => ReadoutBody::SpaceType {
                space_type_name: m.space_type_name,
            },
            RenderMode::BuildingStory => ReadoutBody::BuildingStory {
                building_story_name: m.building_story_name,
            },
            RenderMode::Data => ReadoutBody::Data {
                sample: sample.filter(|s| s.value.is_some()).cloned(),
            },
        };
        Self {
            name: m.name,
            body,
            anchor: (pick.0 + ANCHOR_OFFSET.0, pick.1 + ANCHOR_OFFSET.1),
        }
    }

    /// Display lines, `Label: value`.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![format!("Name: {}", self.name)];
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        match &self.body {
            ReadoutBody::SurfaceType {
                surface_type,
                space_name,
            } => {
                out.push(format!("Surface Type: {surface_type}"));
                if let Some(space) = space_name {
                    out.push(format!("Space Name: {space}"));
                }
            }
            ReadoutBody::Boundary {
                outside_boundary_condition,
                sun_exposure,
                wind_exposure,
            } => {
                if let Some(condition) = outside_boundary_condition {
                    out.push(format!("Outside Boundary Condition: {condition}"));
                }
                out.push(format!("Sun Exposure: {}", text(sun_exposure)));
                out.push(format!("Wind Exposure: {}", text(wind_exposure)));
            }
            ReadoutBody::Construction { construction_name } => {
                if let Some(value) = construction_name {
                    out.push(format!("Construction Name: {value}"));
                }
            }
            ReadoutBody::ThermalZone { thermal_zone_name } => {
                if let Some(value) = thermal_zone_name {
                    out.push(format!("Thermal Zone: {value}"));
                }
            }
            ReadoutBody::SpaceType { space_type_name } => {
                if let Some(value) = space_type_name {
                    out.push(format!("Space Type: {value}"));
                }
            }
            ReadoutBody::BuildingStory {
                building_story_name,
            } => {
                if let Some(story) = building_story_name {
                    out.push(format!("Story Name: {story}"));
                }
            }
            ReadoutBody::Data {
                sample: Some(sample),
            } => {
                out.push(format!("Variable: {}", sample.variable));
                out.push(format!("Key: {}", sample.key_name));
                out.push(format!("Date: {}", sample.date));
                out.push(format!("Time: {}", sample.time));
                if let Some(value) = sample.value {
                    out.push(format!("Value: {} {}", value, sample.units));
                }
            }
            ReadoutBody::Data { sample: None } => {}
        }
        out
    }
}
