// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Render-mode material resolution
//!
//! Resolution is a two-stage pipeline over all surfaces:
//!
//! 1. [`classify`] decides, per surface and independently of every other
//!    surface, its visibility (story and category filters) and its primary,
//!    double-sided and back appearances for the active mode.
//! 2. [`arbitrate`] reads only stage-1 output to decide ghost visibility
//!    for coincident pairs and to switch a surface to its double-sided
//!    appearance when its partner is hidden.
//!
//! Because stage 2 never reads its own output the result does not depend
//! on the order surfaces are visited in.

use bemview_scene::{
    color, Appearance, AppearanceCatalogue, AppearanceKey, Color, Scene, Side, SurfaceEntity,
    SurfaceKey, NORMAL,
};
use slotmap::SecondaryMap;
use tracing::{debug, warn};

use crate::binder::{DataSample, TimeSlice};
use crate::coincidence::{Coincidence, EdgeStyle};
use crate::mode::RenderMode;
use crate::settings::Settings;

/// Name of the highlight appearance.
pub const SELECTED: &str = "Selected";

/// Fixed appearance of the selected surface.
pub fn highlight_appearance() -> Appearance {
    let yellow = Color::new(1.0, 1.0, 0.0);
    Appearance {
        name: SELECTED.to_string(),
        color: yellow,
        side: Side::Double,
        opacity: 1.0,
        emissive: yellow,
    }
}

/// What a surface, or its ghost, is painted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceAppearance {
    /// An entry of the scene's catalogue.
    Catalogue(bemview_scene::AppearanceId),
    /// Double-sided flat color from a data palette.
    Value(Color),
    /// The selection highlight.
    Highlight,
}

impl SurfaceAppearance {
    /// Concrete appearance for the renderer.
    pub fn resolve(&self, catalogue: &AppearanceCatalogue) -> Appearance {
        match self {
            SurfaceAppearance::Catalogue(id) => catalogue.resolve(*id),
            SurfaceAppearance::Value(c) => Appearance {
                name: c.to_hex_string(),
                color: *c,
                side: Side::Double,
                opacity: 1.0,
                emissive: Color::BLACK,
            },
            SurfaceAppearance::Highlight => highlight_appearance(),
        }
    }
}

/// Stage-1 result for one surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub visible: bool,
    pub primary: SurfaceAppearance,
    pub double_sided: SurfaceAppearance,
    pub back: SurfaceAppearance,
    pub data: Option<DataSample>,
}

/// Final render state of one surface, its ghost and its edge overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub visible: bool,
    pub appearance: SurfaceAppearance,
    /// Appearance to use when both faces must render correctly.
    pub double_sided: SurfaceAppearance,
    pub ghost_visible: bool,
    pub ghost_appearance: SurfaceAppearance,
    pub edge_visible: bool,
    pub edge_style: EdgeStyle,
    /// Reading at the selected interval in Data mode.
    pub data: Option<DataSample>,
}

/// Resolved state for every surface of a scene.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    surfaces: SecondaryMap<SurfaceKey, SurfaceState>,
}

impl RenderState {
    pub fn get(&self, key: SurfaceKey) -> Option<&SurfaceState> {
        self.surfaces.get(key)
    }

    pub fn get_mut(&mut self, key: SurfaceKey) -> Option<&mut SurfaceState> {
        self.surfaces.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SurfaceKey, &SurfaceState)> {
        self.surfaces.iter()
    }

    pub fn is_visible(&self, key: SurfaceKey) -> bool {
        self.surfaces.get(key).is_some_and(|s| s.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.surfaces.values().filter(|s| s.visible).count()
    }

    pub fn ghost_count(&self) -> usize {
        self.surfaces.values().filter(|s| s.ghost_visible).count()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

/// Resolves visibility and appearance of every surface for `settings`.
///
/// `slice` supplies the active variable and interval; it is only read in
/// Data mode, where its absence leaves every surface uncolored (white).
pub fn resolve(
    scene: &Scene,
    coincidence: &Coincidence,
    settings: &Settings,
    slice: Option<&TimeSlice<'_>>,
) -> RenderState {
    let stage1 = classify(scene, coincidence, settings, slice);
    let state = arbitrate(&stage1, scene.keys(), coincidence, settings.wireframe);
    debug!(
        mode = %settings.mode,
        visible = state.visible_count(),
        ghosts = state.ghost_count(),
        "resolved render state"
    );
    state
}

/// Stage 1: per-surface visibility and candidate appearances.
pub fn classify(
    scene: &Scene,
    coincidence: &Coincidence,
    settings: &Settings,
    slice: Option<&TimeSlice<'_>>,
) -> SecondaryMap<SurfaceKey, Classified> {
    let mut out = SecondaryMap::with_capacity(scene.len());
    for (key, surface) in scene.surfaces() {
        let metadata = &surface.metadata;
        let visible = settings.story.admits(metadata.building_story_name.as_deref())
            && !settings.filters.hides(&metadata.surface_type);
        let partnered = coincidence.partner(key).is_some();
        out.insert(
            key,
            classify_appearance(scene, surface, partnered, settings, slice, visible),
        );
    }
    out
}

fn classify_appearance(
    scene: &Scene,
    surface: &SurfaceEntity,
    partnered: bool,
    settings: &Settings,
    slice: Option<&TimeSlice<'_>>,
    visible: bool,
) -> Classified {
    let catalogue = &scene.catalogue;
    let metadata = &surface.metadata;
    let lookup = |name: Option<&String>| {
        name.and_then(|n| catalogue.lookup(&AppearanceKey::primary(n.as_str())))
            .map(SurfaceAppearance::Catalogue)
    };

    let mut data = None;
    let (primary, double_sided, back) = match settings.mode {
        RenderMode::SurfaceType | RenderMode::Normal => {
            let stem = if settings.mode == RenderMode::Normal {
                Some(NORMAL)
            } else {
                metadata.appearances.surface_type_material_name.as_deref()
            };
            let base = stem
                .and_then(|s| catalogue.lookup(&AppearanceKey::primary(s)))
                .map(SurfaceAppearance::Catalogue);
            let interior = stem
                .and_then(|s| catalogue.lookup(&AppearanceKey::interior(s)))
                .map(SurfaceAppearance::Catalogue);
            // a present partner paints the outer face, so only the inside shows
            let primary = if partnered { interior } else { base };
            (primary, base, interior)
        }
        RenderMode::Boundary => (lookup(metadata.appearances.boundary_material_name.as_ref()), None, None),
        RenderMode::Construction => (
            lookup(metadata.appearances.construction_material_name.as_ref()),
            None,
            None,
        ),
        RenderMode::ThermalZone => (
            lookup(metadata.appearances.thermal_zone_material_name.as_ref()),
            None,
            None,
        ),
        RenderMode::SpaceType => (
            lookup(metadata.appearances.space_type_material_name.as_ref()),
            None,
            None,
        ),
        RenderMode::BuildingStory => (
            lookup(metadata.appearances.building_story_material_name.as_ref()),
            None,
            None,
        ),
        RenderMode::Data => {
            let (value, min, max) = match slice {
                Some(slice) => {
                    let sample = slice.sample(metadata);
                    let value = sample.value;
                    data = Some(sample);
                    (value, slice.variable.value_min, slice.variable.value_max)
                }
                None => (None, 0.0, 1.0),
            };
            let paint = SurfaceAppearance::Value(color(value, min, max, settings.palette));
            (Some(paint), None, None)
        }
    };

    let primary = primary.unwrap_or_else(|| {
        warn!(
            surface = surface.name(),
            handle = %metadata.handle,
            mode = %settings.mode,
            "no appearance found; using Undefined"
        );
        SurfaceAppearance::Catalogue(catalogue.undefined())
    });

    Classified {
        visible,
        primary,
        double_sided: double_sided.unwrap_or(primary),
        back: back.unwrap_or(primary),
        data,
    }
}

/// Stage 2: coincidence arbitration and edge visibility.
///
/// Reads only `stage1`; `order` affects nothing but iteration.
pub fn arbitrate(
    stage1: &SecondaryMap<SurfaceKey, Classified>,
    order: &[SurfaceKey],
    coincidence: &Coincidence,
    wireframe: bool,
) -> RenderState {
    let mut surfaces = SecondaryMap::with_capacity(order.len());
    for &key in order {
        let Some(c) = stage1.get(key) else { continue };

        let mut appearance = c.primary;
        let mut ghost_visible = c.visible;
        if c.visible {
            if let Some(partner) = coincidence.partner(key) {
                let partner_visible = stage1.get(partner).is_some_and(|p| p.visible);
                if partner_visible {
                    ghost_visible = false;
                } else {
                    ghost_visible = true;
                    appearance = c.double_sided;
                }
            }
        }

        surfaces.insert(
            key,
            SurfaceState {
                visible: c.visible,
                appearance,
                double_sided: c.double_sided,
                ghost_visible,
                ghost_appearance: c.back,
                edge_visible: wireframe || c.visible,
                edge_style: EdgeStyle::NORMAL,
                data: c.data.clone(),
            },
        );
    }
    RenderState { surfaces }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bemview_geometry::{Mesh, Point3};
    use bemview_scene::{AppearanceNames, AppearanceRecord, SurfaceMetadata};

    use crate::settings::{Category, StoryFilter};

    fn square() -> Mesh {
        Mesh::from_polygon(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ])
        .unwrap()
    }

    fn record(name: &str) -> AppearanceRecord {
        AppearanceRecord {
            name: name.into(),
            color: 0x336699,
            side: Side::Front,
            opacity: 1.0,
            emissive: 0,
        }
    }

    fn wall(handle: &str, partner: Option<&str>, story: &str) -> SurfaceMetadata {
        SurfaceMetadata {
            handle: handle.into(),
            name: handle.into(),
            surface_type: "Wall".into(),
            building_story_name: Some(story.into()),
            coincident_with_outside_object: partner.is_some(),
            outside_boundary_condition_object_handle: partner.map(str::to_string),
            appearances: AppearanceNames {
                surface_type_material_name: Some("Wall".into()),
                thermal_zone_material_name: Some("Zone A".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    struct Fixture {
        scene: Scene,
        coincidence: Coincidence,
        a: SurfaceKey,
        b: SurfaceKey,
        lone: SurfaceKey,
    }

    fn fixture() -> Fixture {
        let catalogue = AppearanceCatalogue::from_records(
            ["Wall", "Wall_Int", "NormalMaterial", "NormalMaterial_Int", "Zone A"].map(record),
        );
        let mut scene = Scene::new(catalogue, Default::default());
        let a = scene.add_surface(wall("a", Some("b"), "L1"), square()).unwrap();
        let b = scene.add_surface(wall("b", Some("a"), "L2"), square()).unwrap();
        let lone = scene.add_surface(wall("lone", None, "L1"), square()).unwrap();
        let coincidence = Coincidence::resolve(&scene);
        Fixture { scene, coincidence, a, b, lone }
    }

    fn id(scene: &Scene, key: AppearanceKey) -> SurfaceAppearance {
        SurfaceAppearance::Catalogue(scene.catalogue.lookup(&key).unwrap())
    }

    #[test]
    fn partnered_surfaces_show_interior_and_hide_ghosts() {
        let f = fixture();
        let state = resolve(&f.scene, &f.coincidence, &Settings::default(), None);
        let interior = id(&f.scene, AppearanceKey::interior("Wall"));
        let base = id(&f.scene, AppearanceKey::primary("Wall"));

        let a = state.get(f.a).unwrap();
        assert_eq!(a.appearance, interior);
        assert_eq!(a.double_sided, base);
        assert!(!a.ghost_visible);
        assert_eq!(a.ghost_appearance, interior);

        let lone = state.get(f.lone).unwrap();
        assert_eq!(lone.appearance, base);
        assert!(lone.ghost_visible);
        assert_eq!(lone.ghost_appearance, interior);
    }

    #[test]
    fn hidden_partner_switches_to_double_sided_and_shows_ghost() {
        let f = fixture();
        let settings = Settings {
            story: StoryFilter::from_name("L1"),
            ..Default::default()
        };
        let state = resolve(&f.scene, &f.coincidence, &settings, None);
        let a = state.get(f.a).unwrap();
        assert!(a.visible);
        assert!(a.ghost_visible);
        assert_eq!(a.appearance, id(&f.scene, AppearanceKey::primary("Wall")));

        let b = state.get(f.b).unwrap();
        assert!(!b.visible);
        assert!(!b.ghost_visible);
    }

    #[test]
    fn suffixed_zone_material_is_found_by_exact_name() {
        let catalogue = AppearanceCatalogue::from_records([record("Core_Int")]);
        let mut scene = Scene::new(catalogue, Default::default());
        let mut metadata = wall("core", None, "L1");
        metadata.appearances.thermal_zone_material_name = Some("Core_Int".into());
        let core = scene.add_surface(metadata, square()).unwrap();
        let coincidence = Coincidence::resolve(&scene);
        let settings = Settings {
            mode: RenderMode::ThermalZone,
            ..Default::default()
        };

        let state = resolve(&scene, &coincidence, &settings, None);
        let SurfaceAppearance::Catalogue(found) = state.get(core).unwrap().appearance else {
            panic!("thermal zone mode paints from the catalogue");
        };
        assert_eq!(scene.catalogue.resolve(found).name, "Core_Int");
    }

    #[test]
    fn normal_mode_uses_shared_appearance() {
        let f = fixture();
        let settings = Settings {
            mode: RenderMode::Normal,
            ..Default::default()
        };
        let state = resolve(&f.scene, &f.coincidence, &settings, None);
        assert_eq!(
            state.get(f.lone).unwrap().appearance,
            id(&f.scene, AppearanceKey::primary(NORMAL))
        );
        assert_eq!(
            state.get(f.a).unwrap().appearance,
            id(&f.scene, AppearanceKey::interior(NORMAL))
        );
    }

    #[test]
    fn single_lookup_modes_fall_back_to_primary() {
        let f = fixture();
        let settings = Settings {
            mode: RenderMode::ThermalZone,
            ..Default::default()
        };
        let state = resolve(&f.scene, &f.coincidence, &settings, None);
        let zone = id(&f.scene, AppearanceKey::primary("Zone A"));
        let lone = state.get(f.lone).unwrap();
        assert_eq!(lone.appearance, zone);
        assert_eq!(lone.double_sided, zone);
        assert_eq!(lone.ghost_appearance, zone);
    }

    #[test]
    fn missing_appearance_degrades_to_undefined() {
        let f = fixture();
        let settings = Settings {
            mode: RenderMode::Construction,
            ..Default::default()
        };
        let state = resolve(&f.scene, &f.coincidence, &settings, None);
        let undefined = SurfaceAppearance::Catalogue(f.scene.catalogue.undefined());
        for (_, s) in state.iter() {
            assert_eq!(s.appearance, undefined);
        }
    }

    #[test]
    fn data_mode_without_variable_is_white() {
        let f = fixture();
        let settings = Settings {
            mode: RenderMode::Data,
            ..Default::default()
        };
        let state = resolve(&f.scene, &f.coincidence, &settings, None);
        let lone = state.get(f.lone).unwrap();
        assert_eq!(lone.appearance, SurfaceAppearance::Value(Color::WHITE));
        assert_eq!(lone.ghost_appearance, lone.appearance);
    }

    #[test]
    fn edges_follow_wireframe_or_visibility() {
        let f = fixture();
        for wireframe in [true, false] {
            let mut settings = Settings {
                wireframe,
                ..Default::default()
            };
            settings.filters.set(Category::Walls, false);
            let state = resolve(&f.scene, &f.coincidence, &settings, None);
            for (_, s) in state.iter() {
                assert!(!s.visible);
                assert_eq!(s.edge_visible, wireframe);
            }
        }
    }

    #[test]
    fn arbitration_ignores_visit_order() {
        let f = fixture();
        let settings = Settings {
            story: StoryFilter::from_name("L2"),
            ..Default::default()
        };
        let stage1 = classify(&f.scene, &f.coincidence, &settings, None);
        let forward: Vec<_> = f.scene.keys().to_vec();
        let reverse: Vec<_> = forward.iter().rev().copied().collect();

        let one = arbitrate(&stage1, &forward, &f.coincidence, false);
        let two = arbitrate(&stage1, &reverse, &f.coincidence, false);
        for key in forward {
            assert_eq!(one.get(key), two.get(key));
        }
    }

    #[test]
    fn appearances_resolve_for_renderer() {
        let f = fixture();
        let highlight = SurfaceAppearance::Highlight.resolve(&f.scene.catalogue);
        assert_eq!(highlight.name, SELECTED);
        assert_eq!(highlight.side, Side::Double);

        let value = SurfaceAppearance::Value(Color::new(1.0, 0.0, 0.0)).resolve(&f.scene.catalogue);
        assert_eq!(value.side, Side::Double);
        assert_eq!(value.name, "#ff0000");
    }
}
