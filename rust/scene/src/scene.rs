// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The loaded scene.
//!
//! A [`Scene`] owns the surfaces in load order, the appearance catalogue,
//! the bounding sphere, story names, variables and their time arrays. It is
//! immutable once built; per-surface render state lives in the engine.
//!
//! [`SceneDocument`] is a JSON stand-in for the exporter's output: surface
//! polygons in OpenStudio coordinates plus the same metadata the exporter
//! attaches to each object.

use bemview_geometry::{from_openstudio, Mesh, Point3};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use slotmap::SlotMap;
use tracing::debug;

use crate::appearance::{AppearanceCatalogue, AppearanceRecord};
use crate::error::{Error, Result};
use crate::keys::SurfaceKey;
use crate::surface::{SurfaceEntity, SurfaceMetadata};
use crate::variable::Variable;

/// Orbit target and extent of the model, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: Point3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Sphere from an OpenStudio-space center.
    pub fn from_openstudio(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Self::new(from_openstudio(x, y, z), radius)
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self::new(Point3::origin(), 1.0)
    }
}

/// Surfaces and supporting data for one model.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    surfaces: SlotMap<SurfaceKey, SurfaceEntity>,
    order: Vec<SurfaceKey>,
    by_handle: FxHashMap<String, SurfaceKey>,
    pub catalogue: AppearanceCatalogue,
    pub bounds: BoundingSphere,
    pub story_names: Vec<String>,
    variables: Vec<Variable>,
    times: Vec<Vec<f64>>,
}

impl Scene {
    pub fn new(catalogue: AppearanceCatalogue, bounds: BoundingSphere) -> Self {
        Self {
            catalogue,
            bounds,
            ..Default::default()
        }
    }

    /// Adds a surface. Handles must be unique; empty handles are not
    /// indexed.
    pub fn add_surface(&mut self, metadata: SurfaceMetadata, geometry: Mesh) -> Result<SurfaceKey> {
        if !metadata.handle.is_empty() && self.by_handle.contains_key(&metadata.handle) {
            return Err(Error::DuplicateHandle(metadata.handle));
        }
        let handle = metadata.handle.clone();
        let key = self.surfaces.insert(SurfaceEntity::new(metadata, geometry));
        if !handle.is_empty() {
            self.by_handle.insert(handle, key);
        }
        self.order.push(key);
        Ok(key)
    }

    /// Adds a variable sampled on time array `variable.time_index`.
    pub fn add_variable(&mut self, variable: Variable) -> Result<()> {
        if variable.time_index >= self.times.len() {
            return Err(Error::InvalidVariable {
                reason: format!(
                    "time index {} but the scene has {} time arrays",
                    variable.time_index,
                    self.times.len()
                ),
                name: variable.name,
            });
        }
        if variable.intervals_per_day <= 0.0 || variable.intervals_per_hour <= 0.0 {
            return Err(Error::InvalidVariable {
                reason: "intervals per day and per hour must be positive".to_string(),
                name: variable.name,
            });
        }
        self.variables.push(variable);
        Ok(())
    }

    /// Adds a time array (seconds since the Unix epoch) and returns its index.
    pub fn add_times(&mut self, times: Vec<f64>) -> usize {
        self.times.push(times);
        self.times.len() - 1
    }

    pub fn surface(&self, key: SurfaceKey) -> Option<&SurfaceEntity> {
        self.surfaces.get(key)
    }

    /// Surfaces in load order.
    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceKey, &SurfaceEntity)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.surfaces.get(key).map(|s| (key, s)))
    }

    /// Surface keys in load order.
    pub fn keys(&self) -> &[SurfaceKey] {
        &self.order
    }

    pub fn find_by_handle(&self, handle: &str) -> Option<SurfaceKey> {
        self.by_handle.get(handle).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// True when the scene carries simulation output.
    pub fn has_data(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Timestamp in epoch seconds of `interval` for `variable`.
    pub fn timestamp(&self, variable: &Variable, interval: usize) -> Option<f64> {
        self.times.get(variable.time_index)?.get(interval).copied()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: SceneDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn from_document(document: SceneDocument) -> Result<Self> {
        let b = &document.metadata.bounding_box;
        let bounds = BoundingSphere::from_openstudio(b.look_at_x, b.look_at_y, b.look_at_z, b.look_at_r);
        let mut scene = Self::new(AppearanceCatalogue::from_records(document.materials), bounds);
        scene.story_names = document.metadata.building_story_names;

        for record in document.surfaces {
            let points: Vec<Point3<f64>> = record
                .vertices
                .iter()
                .map(|&[x, y, z]| from_openstudio(x, y, z))
                .collect();
            let mesh = Mesh::from_polygon(&points)?;
            scene.add_surface(record.user_data, mesh)?;
        }
        for times in document.times {
            scene.add_times(times);
        }
        for variable in document.variables {
            scene.add_variable(variable)?;
        }

        debug!(
            surfaces = scene.len(),
            appearances = scene.catalogue.len(),
            variables = scene.variables.len(),
            stories = scene.story_names.len(),
            "scene loaded"
        );
        Ok(scene)
    }
}

/// Serialized scene as written by the model exporter.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneDocument {
    pub metadata: DocumentMetadata,
    #[serde(default)]
    pub materials: Vec<AppearanceRecord>,
    #[serde(default)]
    pub surfaces: Vec<SurfaceRecord>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub times: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub bounding_box: BoundingBoxRecord,
    #[serde(default)]
    pub building_story_names: Vec<String>,
}

/// Look-at point and radius in OpenStudio coordinates.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BoundingBoxRecord {
    #[serde(rename = "lookAtX")]
    pub look_at_x: f64,
    #[serde(rename = "lookAtY")]
    pub look_at_y: f64,
    #[serde(rename = "lookAtZ")]
    pub look_at_z: f64,
    #[serde(rename = "lookAtR")]
    pub look_at_r: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceRecord {
    pub user_data: SurfaceMetadata,
    /// Polygon vertices in OpenStudio coordinates.
    pub vertices: Vec<[f64; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DOCUMENT: &str = r#"{
        "metadata": {
            "boundingBox": {"lookAtX": 5.0, "lookAtY": 2.0, "lookAtZ": 1.5, "lookAtR": 10.0},
            "buildingStoryNames": ["Story 1"]
        },
        "materials": [{"name": "Wall", "color": 13421772}],
        "surfaces": [
            {
                "userData": {"handle": "{a}", "name": "Wall 1", "surfaceType": "Wall"},
                "vertices": [[0, 0, 0], [10, 0, 0], [10, 0, 3], [0, 0, 3]]
            }
        ],
        "times": [[0, 3600]],
        "variables": [{
            "name": "Temp", "valueMin": 0, "valueMax": 1,
            "intervalsPerDay": 24, "intervalsPerHour": 1, "timeIndex": 0
        }]
    }"#;

    #[test]
    fn document_builds_scene() {
        let scene = Scene::from_json(DOCUMENT).unwrap();
        assert_eq!(scene.len(), 1);
        assert!(scene.has_data());
        assert_eq!(scene.story_names, vec!["Story 1".to_string()]);
        // OpenStudio (5, 2, 1.5) is world (5, 1.5, -2)
        assert_relative_eq!(scene.bounds.center, Point3::new(5.0, 1.5, -2.0));

        let key = scene.find_by_handle("{a}").unwrap();
        let wall = scene.surface(key).unwrap();
        assert_eq!(wall.geometry.triangle_count(), 2);
        let (min, max) = wall.geometry.bounds();
        assert_eq!(max.y, 3.0);
        assert_eq!(min.z, 0.0);
    }

    #[test]
    fn timestamps_come_from_the_variable_time_array() {
        let scene = Scene::from_json(DOCUMENT).unwrap();
        let variable = scene.variable("Temp").unwrap();
        assert_eq!(scene.timestamp(variable, 1), Some(3600.0));
        assert_eq!(scene.timestamp(variable, 2), None);
    }

    #[test]
    fn duplicate_handles_are_rejected() {
        let mut scene = Scene::default();
        let metadata = SurfaceMetadata {
            handle: "{a}".into(),
            ..Default::default()
        };
        scene.add_surface(metadata.clone(), Mesh::new()).unwrap();
        assert!(matches!(
            scene.add_surface(metadata, Mesh::new()),
            Err(Error::DuplicateHandle(h)) if h == "{a}"
        ));
    }

    #[test]
    fn variable_needs_its_time_array() {
        let mut scene = Scene::default();
        let variable: Variable = serde_json::from_str(
            r#"{"name": "T", "valueMin": 0, "valueMax": 1, "intervalsPerDay": 24, "intervalsPerHour": 1}"#,
        )
        .unwrap();
        assert!(matches!(
            scene.add_variable(variable.clone()),
            Err(Error::InvalidVariable { .. })
        ));
        scene.add_times(vec![0.0]);
        scene.add_variable(variable).unwrap();
    }

    #[test]
    fn surfaces_iterate_in_load_order() {
        let mut scene = Scene::default();
        for name in ["c", "a", "b"] {
            let metadata = SurfaceMetadata {
                handle: name.into(),
                name: name.into(),
                ..Default::default()
            };
            scene.add_surface(metadata, Mesh::new()).unwrap();
        }
        let names: Vec<&str> = scene.surfaces().map(|(_, s)| s.name()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn degenerate_polygon_fails_load() {
        let json = r#"{
            "metadata": {"boundingBox": {"lookAtX": 0, "lookAtY": 0, "lookAtZ": 0, "lookAtR": 1}},
            "surfaces": [{"userData": {"handle": "x"}, "vertices": [[0, 0, 0]]}]
        }"#;
        assert!(matches!(Scene::from_json(json), Err(Error::Geometry(_))));
    }
}
