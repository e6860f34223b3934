// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coincidence and back-face resolution
//!
//! Built once per scene. For every surface the resolver derives:
//!
//! - its coincident partner, if the loader flagged one and the partner's
//!   handle resolves (no reciprocal inference, no geometric test);
//! - a back-face ghost that shares the surface's mesh and is used only to
//!   paint the reverse side;
//! - an edge overlay made of the mesh's outline segments.
//!
//! Visibility and appearance of all three are owned by the material
//! resolver, not by this module.

use std::sync::Arc;

use bemview_geometry::{Mesh, Point3};
use bemview_scene::{Color, Scene, SurfaceKey};
use slotmap::SecondaryMap;
use tracing::{debug, warn};

/// Suffix appended to a surface name to name its ghost.
pub const GHOST_SUFFIX: &str = " Back";

/// Line color and width of an edge overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f32,
}

impl EdgeStyle {
    pub const NORMAL: EdgeStyle = EdgeStyle {
        color: Color::BLACK,
        width: 1.0,
    };

    pub const HIGHLIGHT: EdgeStyle = EdgeStyle {
        color: Color::new(0.0, 1.0, 0.0),
        width: 4.0,
    };
}

/// Geometry clone used to render a surface's back face.
#[derive(Debug, Clone)]
pub struct Ghost {
    pub name: String,
    pub geometry: Arc<Mesh>,
}

/// Outline segments of a surface.
#[derive(Debug, Clone)]
pub struct EdgeOverlay {
    pub segments: Vec<[Point3<f64>; 2]>,
}

/// Derived per-surface structures for one scene.
#[derive(Debug, Clone, Default)]
pub struct Coincidence {
    partners: SecondaryMap<SurfaceKey, SurfaceKey>,
    ghosts: SecondaryMap<SurfaceKey, Ghost>,
    edges: SecondaryMap<SurfaceKey, EdgeOverlay>,
}

impl Coincidence {
    pub fn resolve(scene: &Scene) -> Self {
        let mut resolved = Self::default();

        for (key, surface) in scene.surfaces() {
            if let Some(handle) = surface.metadata.partner_handle() {
                match scene.find_by_handle(handle) {
                    Some(partner) => {
                        resolved.partners.insert(key, partner);
                    }
                    None => warn!(
                        surface = surface.name(),
                        partner = handle,
                        "coincident partner not found; relation omitted"
                    ),
                }
            }

            resolved.ghosts.insert(
                key,
                Ghost {
                    name: format!("{}{}", surface.name(), GHOST_SUFFIX),
                    geometry: Arc::clone(&surface.geometry),
                },
            );
            resolved.edges.insert(
                key,
                EdgeOverlay {
                    segments: surface.geometry.boundary_edges(),
                },
            );
        }

        debug!(
            surfaces = scene.len(),
            ghosts = resolved.ghosts.len(),
            edges = resolved.edges.len(),
            coincident = resolved.partners.len(),
            "resolved coincidence"
        );
        resolved
    }

    pub fn partner(&self, key: SurfaceKey) -> Option<SurfaceKey> {
        self.partners.get(key).copied()
    }

    pub fn ghost(&self, key: SurfaceKey) -> Option<&Ghost> {
        self.ghosts.get(key)
    }

    pub fn edges(&self, key: SurfaceKey) -> Option<&EdgeOverlay> {
        self.edges.get(key)
    }

    /// Number of surfaces with a resolved partner.
    pub fn pair_count(&self) -> usize {
        self.partners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bemview_scene::SurfaceMetadata;

    fn square() -> Mesh {
        Mesh::from_polygon(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    fn surface(handle: &str, partner: Option<&str>) -> SurfaceMetadata {
        SurfaceMetadata {
            handle: handle.into(),
            name: format!("Surface {handle}"),
            surface_type: "Wall".into(),
            coincident_with_outside_object: partner.is_some(),
            outside_boundary_condition_object_handle: partner.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn partners_resolve_by_handle_without_reciprocity() {
        let mut scene = Scene::default();
        let a = scene.add_surface(surface("a", Some("b")), square()).unwrap();
        let b = scene.add_surface(surface("b", None), square()).unwrap();
        let c = scene.add_surface(surface("c", Some("missing")), square()).unwrap();

        let resolved = Coincidence::resolve(&scene);
        assert_eq!(resolved.partner(a), Some(b));
        assert_eq!(resolved.partner(b), None);
        assert_eq!(resolved.partner(c), None);
        assert_eq!(resolved.pair_count(), 1);
    }

    #[test]
    fn every_surface_gets_one_ghost_and_one_overlay() {
        let mut scene = Scene::default();
        let keys: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|h| scene.add_surface(surface(h, None), square()).unwrap())
            .collect();

        let resolved = Coincidence::resolve(&scene);
        for key in keys {
            let ghost = resolved.ghost(key).unwrap();
            let original = scene.surface(key).unwrap();
            assert!(ghost.name.ends_with(GHOST_SUFFIX));
            assert!(Arc::ptr_eq(&ghost.geometry, &original.geometry));
            assert_eq!(resolved.edges(key).unwrap().segments.len(), 4);
        }
    }

    #[test]
    fn flag_without_partner_handle_is_ignored() {
        let mut scene = Scene::default();
        let mut metadata = surface("a", None);
        metadata.coincident_with_outside_object = true;
        let a = scene.add_surface(metadata, square()).unwrap();
        assert_eq!(Coincidence::resolve(&scene).partner(a), None);
    }
}
