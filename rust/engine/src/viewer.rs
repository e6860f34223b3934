// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer state
//!
//! [`ViewerState`] owns everything the viewer mutates: the scene and its
//! derived structures, the user settings, the resolved render state, the
//! selection, both camera rigs and the legend. UI handlers call its setters;
//! each setter applies its change completely, so the next frame always sees
//! a consistent state.

use std::sync::Arc;

use bemview_geometry::{screen_to_ndc, Camera, Mesh, Point3, Projection};
use bemview_scene::{Appearance, Palette, Scene, SurfaceKey};
use image::RgbaImage;
use tracing::debug;

use crate::binder::{HourCycle, TimeSlice};
use crate::coincidence::{Coincidence, EdgeStyle};
use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::legend::{self, LegendCursor, LegendLabels, LegendPlacement};
use crate::materials::{self, RenderState};
use crate::mode::RenderMode;
use crate::navigation::{axes, AxisLine, OrbitController, OrbitPreset};
use crate::preferences::{self, get_float, set_value, PreferenceStore};
use crate::readout::InfoReadout;
use crate::selection::{pick, PointerTracker, SelectionController};
use crate::settings::{Category, Settings, StoryFilter, ALL_STORIES};

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f64 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

/// One visible entity for the external renderer.
#[derive(Debug, Clone)]
pub enum DrawItem<'a> {
    Surface {
        key: SurfaceKey,
        name: &'a str,
        geometry: &'a Arc<Mesh>,
        appearance: Appearance,
    },
    Ghost {
        key: SurfaceKey,
        name: &'a str,
        geometry: &'a Arc<Mesh>,
        appearance: Appearance,
    },
    Edges {
        key: SurfaceKey,
        segments: &'a [[Point3<f64>; 2]],
        style: EdgeStyle,
    },
}

/// The active variable at the current day and hour, in Data mode only.
fn time_slice<'a>(scene: &'a Scene, settings: &Settings) -> Option<TimeSlice<'a>> {
    if !settings.mode.is_data() {
        return None;
    }
    let variable = scene.variable(settings.variable.as_deref()?)?;
    Some(TimeSlice::new(scene, variable, settings.day, settings.hour))
}

/// Explicit owner of all viewer state.
pub struct ViewerState {
    scene: Scene,
    coincidence: Coincidence,
    config: ViewerConfig,
    settings: Settings,
    preferences: Box<dyn PreferenceStore>,
    render: RenderState,
    selection: SelectionController,
    pointer: PointerTracker,
    navigation: OrbitController,
    legend: LegendPlacement,
    hour_cycle: HourCycle,
    viewport: Viewport,
    pick_point: (f64, f64),
    readout: Option<InfoReadout>,
    legend_cursor: Option<LegendCursor>,
}

impl ViewerState {
    pub fn new(
        scene: Scene,
        config: ViewerConfig,
        preferences: Box<dyn PreferenceStore>,
        viewport: Viewport,
    ) -> Self {
        let settings = Settings::from_preferences(preferences.as_ref());
        let coincidence = Coincidence::resolve(&scene);
        let projection = if settings.orthographic {
            Projection::Orthographic
        } else {
            Projection::Perspective
        };
        let navigation =
            OrbitController::new(&scene.bounds, &config, viewport.aspect(), projection);
        let mut legend = LegendPlacement::new(
            get_float(preferences.as_ref(), preferences::COLOR_BAR_TOP, 0.0),
            get_float(preferences.as_ref(), preferences::COLOR_BAR_LEFT, 0.0),
        );
        legend.fit_in_window(
            viewport.width,
            viewport.height,
            config.legend_width,
            config.legend_height,
            settings.rotate_legend,
        );

        let mut viewer = Self {
            scene,
            coincidence,
            config,
            settings,
            preferences,
            render: RenderState::default(),
            selection: SelectionController::default(),
            pointer: PointerTracker::default(),
            navigation,
            legend,
            hour_cycle: HourCycle::default(),
            viewport,
            pick_point: (0.0, 0.0),
            readout: None,
            legend_cursor: None,
        };
        viewer.refresh();
        debug!(
            surfaces = viewer.scene.len(),
            pairs = viewer.coincidence.pair_count(),
            has_data = viewer.scene.has_data(),
            "viewer ready"
        );
        viewer
    }

    // --- accessors ---

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn coincidence(&self) -> &Coincidence {
        &self.coincidence
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    pub fn selected(&self) -> Option<SurfaceKey> {
        self.selection.selected()
    }

    pub fn readout(&self) -> Option<&InfoReadout> {
        self.readout.as_ref()
    }

    pub fn legend_cursor(&self) -> Option<&LegendCursor> {
        self.legend_cursor.as_ref()
    }

    pub fn legend_placement(&self) -> LegendPlacement {
        self.legend
    }

    pub fn navigation(&self) -> &OrbitController {
        &self.navigation
    }

    pub fn active_camera(&self) -> &Camera {
        self.navigation.active_camera()
    }

    pub fn available_modes(&self) -> Vec<RenderMode> {
        RenderMode::available(self.scene.has_data())
    }

    /// Story filter choices, "All Stories" first.
    pub fn story_choices(&self) -> Vec<String> {
        std::iter::once(ALL_STORIES.to_string())
            .chain(self.scene.story_names.iter().cloned())
            .collect()
    }

    // --- control handlers ---

    pub fn set_mode(&mut self, mode: RenderMode) -> Result<()> {
        if mode.is_data() && !self.scene.has_data() {
            return Err(Error::ModeUnavailable(mode));
        }
        self.deselect();
        if mode.is_data() {
            if self.settings.variable.is_none() {
                self.settings.variable = self.scene.variables().first().map(|v| v.name.clone());
            }
        } else if self.settings.mode.is_data() {
            self.settings.cycle_hour = false;
            self.hour_cycle.reset();
        }
        self.settings.mode = mode;
        self.refresh();
        Ok(())
    }

    pub fn set_story(&mut self, story: &str) {
        self.deselect();
        self.settings.story = StoryFilter::from_name(story);
        self.refresh();
    }

    pub fn set_category(&mut self, category: Category, shown: bool) {
        self.deselect();
        self.settings.filters.set(category, shown);
        set_value(self.preferences.as_mut(), category.preference_key(), shown);
        self.refresh();
    }

    pub fn set_wireframe(&mut self, on: bool) {
        self.deselect();
        self.settings.wireframe = on;
        set_value(self.preferences.as_mut(), preferences::SHOW_WIREFRAME, on);
        self.refresh();
    }

    pub fn set_orthographic(&mut self, on: bool) {
        self.settings.orthographic = on;
        self.navigation.set_projection(if on {
            Projection::Orthographic
        } else {
            Projection::Perspective
        });
        set_value(self.preferences.as_mut(), preferences::ORTHOGRAPHIC, on);
    }

    pub fn set_variable(&mut self, name: &str) -> Result<()> {
        if self.scene.variable(name).is_none() {
            return Err(Error::UnknownVariable(name.to_string()));
        }
        self.settings.variable = Some(name.to_string());
        self.refresh();
        Ok(())
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.settings.palette = palette;
        set_value(self.preferences.as_mut(), preferences::COLOR_SCHEME, palette);
        self.refresh();
    }

    pub fn set_day(&mut self, day: f64) {
        self.settings.day = day;
        self.refresh();
    }

    pub fn set_hour(&mut self, hour: f64) {
        self.settings.hour = hour;
        self.refresh();
    }

    pub fn set_cycle_hour(&mut self, on: bool) {
        self.settings.cycle_hour = on;
        self.hour_cycle.reset();
    }

    pub fn set_cycle_speed(&mut self, speed: f64) {
        self.settings.cycle_speed = speed;
        set_value(self.preferences.as_mut(), preferences::CYCLE_SPEED, speed);
    }

    pub fn set_rotate_legend(&mut self, on: bool) {
        self.settings.rotate_legend = on;
        set_value(self.preferences.as_mut(), preferences::ROTATE_COLOR_BAR, on);
        self.fit_legend();
    }

    pub fn orbit_preset(&mut self, preset: OrbitPreset) {
        self.navigation.preset(preset);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.navigation.set_aspect(self.viewport.aspect());
        self.fit_legend();
    }

    /// Moves the legend by a drag offset and persists its position.
    pub fn drop_legend(&mut self, dx: f64, dy: f64) {
        self.legend.drop_by(dx, dy);
        self.fit_legend();
        set_value(self.preferences.as_mut(), preferences::COLOR_BAR_TOP, self.legend.top);
        set_value(self.preferences.as_mut(), preferences::COLOR_BAR_LEFT, self.legend.left);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pointer.pointer_down(x, y);
    }

    /// Completes a pointer gesture; a click selects the surface under the
    /// pointer or clears the selection.
    pub fn pointer_up(&mut self, x: f64, y: f64) {
        if !self.pointer.pointer_up(x, y) {
            return;
        }
        let ndc = screen_to_ndc(x, y, self.viewport.width, self.viewport.height);
        match pick(&self.scene, &self.render, self.navigation.active_camera(), ndc) {
            Some(key) => self.select(key, (x, y)),
            None => self.deselect(),
        }
    }

    /// Selects `key` as if it had been picked at `at`.
    pub fn select(&mut self, key: SurfaceKey, at: (f64, f64)) {
        self.selection
            .select(key, &mut self.render, &self.coincidence, self.settings.mode);
        self.pick_point = at;
        self.update_readout();
    }

    pub fn deselect(&mut self) {
        self.selection.clear(&mut self.render);
        self.readout = None;
        self.legend_cursor = None;
    }

    /// Per-frame update: camera transitions and hour cycling.
    pub fn tick(&mut self, dt: f64) {
        self.navigation.tick(dt);
        if self.settings.cycle_hour && self.settings.mode.is_data() {
            let speed = self.settings.cycle_speed;
            if self.hour_cycle.advance(dt, speed, &mut self.settings.hour) > 0 {
                self.refresh();
            }
        }
    }

    // --- outputs ---

    /// Visible surfaces, ghosts and edge overlays in load order.
    pub fn draw_list(&self) -> Vec<DrawItem<'_>> {
        let catalogue = &self.scene.catalogue;
        let mut items = Vec::new();
        for (key, surface) in self.scene.surfaces() {
            let Some(state) = self.render.get(key) else { continue };
            if state.visible {
                items.push(DrawItem::Surface {
                    key,
                    name: surface.name(),
                    geometry: &surface.geometry,
                    appearance: state.appearance.resolve(catalogue),
                });
            }
            if state.ghost_visible {
                if let Some(ghost) = self.coincidence.ghost(key) {
                    items.push(DrawItem::Ghost {
                        key,
                        name: &ghost.name,
                        geometry: &ghost.geometry,
                        appearance: state.ghost_appearance.resolve(catalogue),
                    });
                }
            }
            if state.edge_visible {
                if let Some(edges) = self.coincidence.edges(key) {
                    items.push(DrawItem::Edges {
                        key,
                        segments: &edges.segments,
                        style: state.edge_style,
                    });
                }
            }
        }
        items
    }

    pub fn legend_raster(&self) -> RgbaImage {
        legend::raster(
            self.settings.palette,
            self.config.legend_width,
            self.config.legend_height,
        )
    }

    /// Min/max labels of the active variable in Data mode.
    pub fn legend_labels(&self) -> Option<LegendLabels> {
        let slice = time_slice(&self.scene, &self.settings)?;
        Some(legend::labels(
            slice.variable.value_min,
            slice.variable.value_max,
        ))
    }

    /// `MM/DD - HH:MM` of the active interval in Data mode.
    pub fn date_time_label(&self) -> Option<String> {
        time_slice(&self.scene, &self.settings).map(|slice| slice.label())
    }

    pub fn axes(&self) -> [AxisLine; 3] {
        axes(self.navigation.radius())
    }

    // --- internals ---

    /// Re-resolves the render state and re-applies the selection to it.
    fn refresh(&mut self) {
        let slice = time_slice(&self.scene, &self.settings);
        self.render =
            materials::resolve(&self.scene, &self.coincidence, &self.settings, slice.as_ref());
        self.selection
            .reapply(&mut self.render, &self.coincidence, self.settings.mode);
        self.update_readout();
    }

    fn update_readout(&mut self) {
        let Some(key) = self.selection.selected() else {
            self.readout = None;
            self.legend_cursor = None;
            return;
        };
        let Some(surface) = self.scene.surface(key) else {
            return;
        };
        let sample = self.render.get(key).and_then(|s| s.data.as_ref());
        self.readout = Some(InfoReadout::new(
            self.settings.mode,
            &surface.metadata,
            sample,
            self.pick_point,
        ));
        self.legend_cursor = match time_slice(&self.scene, &self.settings) {
            Some(slice) => legend::cursor(
                sample.and_then(|s| s.value),
                slice.variable.value_min,
                slice.variable.value_max,
                self.config.legend_width,
            ),
            None => None,
        };
    }

    fn fit_legend(&mut self) {
        self.legend.fit_in_window(
            self.viewport.width,
            self.viewport.height,
            self.config.legend_width,
            self.config.legend_height,
            self.settings.rotate_legend,
        );
    }
}
