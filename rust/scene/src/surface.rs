// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface entities and their metadata.

use std::sync::Arc;

use bemview_geometry::Mesh;
use serde::{Deserialize, Serialize};

/// Link from a surface to one output variable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableBinding {
    pub name: String,
    /// Row of the variable's value matrix, if the surface reports it.
    #[serde(default)]
    pub value_index: Option<usize>,
    /// Reporting key, usually the object name in upper case.
    #[serde(default)]
    pub key_name: Option<String>,
}

/// Catalogue material names per classification.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppearanceNames {
    pub surface_type_material_name: Option<String>,
    pub boundary_material_name: Option<String>,
    pub construction_material_name: Option<String>,
    pub thermal_zone_material_name: Option<String>,
    pub space_type_material_name: Option<String>,
    pub building_story_material_name: Option<String>,
}

/// Immutable description of one model surface, as produced by the loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceMetadata {
    pub handle: String,
    pub name: String,
    pub surface_type: String,
    pub space_name: Option<String>,
    pub construction_name: Option<String>,
    pub thermal_zone_name: Option<String>,
    pub space_type_name: Option<String>,
    pub building_story_name: Option<String>,
    pub outside_boundary_condition: Option<String>,
    pub outside_boundary_condition_object_handle: Option<String>,
    pub sun_exposure: Option<String>,
    pub wind_exposure: Option<String>,
    /// Set only when the partner's vertices are identical to this surface's.
    pub coincident_with_outside_object: bool,
    #[serde(flatten)]
    pub appearances: AppearanceNames,
    pub variables: Vec<VariableBinding>,
}

impl SurfaceMetadata {
    /// Handle of the coincident partner, when the loader asserts one.
    pub fn partner_handle(&self) -> Option<&str> {
        if self.coincident_with_outside_object {
            self.outside_boundary_condition_object_handle.as_deref()
        } else {
            None
        }
    }

    /// First binding for `variable`, if any.
    pub fn binding(&self, variable: &str) -> Option<&VariableBinding> {
        self.variables.iter().find(|b| b.name == variable)
    }
}

/// A surface in the scene: metadata plus shared geometry.
///
/// The back-face ghost reuses the same mesh through the `Arc`.
#[derive(Debug, Clone)]
pub struct SurfaceEntity {
    pub metadata: SurfaceMetadata,
    pub geometry: Arc<Mesh>,
}

impl SurfaceEntity {
    pub fn new(metadata: SurfaceMetadata, geometry: Mesh) -> Self {
        Self {
            metadata,
            geometry: Arc::new(geometry),
        }
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn surface_type(&self) -> &str {
        &self.metadata.surface_type
    }
}
