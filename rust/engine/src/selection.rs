// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Picking and selection
//!
//! A pick is a pointer press and release at the same pixel; anything else
//! is a camera drag. The pick ray comes from the active camera and is only
//! tested against visible surfaces.
//!
//! At most one surface is selected. Outside Data mode the selected surface,
//! its ghost and its partner are repainted with the highlight appearance,
//! and their prior looks are cached so deselection restores them exactly.
//! Data mode keeps the value colors and only highlights the edge overlay.

use bemview_geometry::{intersect_mesh, Camera, Point2};
use bemview_scene::{Scene, SurfaceKey};

use crate::coincidence::{Coincidence, EdgeStyle};
use crate::materials::{RenderState, SurfaceAppearance};
use crate::mode::RenderMode;

/// Press/release bookkeeping that separates clicks from drags.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    down: Option<(f64, f64)>,
}

impl PointerTracker {
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.down = Some((x, y));
    }

    /// True when the release is at the exact press position.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.down.take() == Some((x, y))
    }
}

/// Nearest visible surface under `ndc`, if any.
pub fn pick(
    scene: &Scene,
    state: &RenderState,
    camera: &Camera,
    ndc: Point2<f64>,
) -> Option<SurfaceKey> {
    let ray = camera.ray_from_ndc(ndc);
    scene
        .surfaces()
        .filter(|(key, _)| state.is_visible(*key))
        .filter_map(|(key, surface)| intersect_mesh(&ray, &surface.geometry).map(|t| (key, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

/// Visibility and appearance of one render entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub visible: bool,
    pub appearance: SurfaceAppearance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Part {
    Surface(SurfaceKey),
    Ghost(SurfaceKey),
}

impl Part {
    fn look(&self, state: &RenderState) -> Option<Look> {
        match *self {
            Part::Surface(key) => state.get(key).map(|s| Look {
                visible: s.visible,
                appearance: s.appearance,
            }),
            Part::Ghost(key) => state.get(key).map(|s| Look {
                visible: s.ghost_visible,
                appearance: s.ghost_appearance,
            }),
        }
    }

    fn apply(&self, state: &mut RenderState, look: Look) {
        match *self {
            Part::Surface(key) => {
                if let Some(s) = state.get_mut(key) {
                    s.visible = look.visible;
                    s.appearance = look.appearance;
                }
            }
            Part::Ghost(key) => {
                if let Some(s) = state.get_mut(key) {
                    s.ghost_visible = look.visible;
                    s.ghost_appearance = look.appearance;
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Selection {
    key: SurfaceKey,
    /// Pre-highlight looks; empty in Data mode.
    cached: Vec<(Part, Look)>,
}

/// Owns the current selection and its cached looks.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    current: Option<Selection>,
}

impl SelectionController {
    pub fn selected(&self) -> Option<SurfaceKey> {
        self.current.as_ref().map(|s| s.key)
    }

    /// Selects `key`, restoring any previous selection first.
    pub fn select(
        &mut self,
        key: SurfaceKey,
        state: &mut RenderState,
        coincidence: &Coincidence,
        mode: RenderMode,
    ) {
        self.clear(state);

        if let Some(s) = state.get_mut(key) {
            s.edge_style = EdgeStyle::HIGHLIGHT;
        }

        let mut cached = Vec::new();
        if !mode.is_data() {
            let mut parts = vec![Part::Surface(key), Part::Ghost(key)];
            if let Some(partner) = coincidence.partner(key) {
                parts.push(Part::Surface(partner));
            }
            for part in parts {
                let Some(look) = part.look(state) else { continue };
                cached.push((part, look));
                part.apply(
                    state,
                    Look {
                        // only the picked surface is forced on screen
                        visible: look.visible || part == Part::Surface(key),
                        appearance: SurfaceAppearance::Highlight,
                    },
                );
            }
        }

        self.current = Some(Selection { key, cached });
    }

    /// Deselects, restoring cached looks and the edge style. A no-op when
    /// nothing is selected.
    pub fn clear(&mut self, state: &mut RenderState) {
        let Some(selection) = self.current.take() else {
            return;
        };
        if let Some(s) = state.get_mut(selection.key) {
            s.edge_style = EdgeStyle::NORMAL;
        }
        for (part, look) in selection.cached.into_iter().rev() {
            part.apply(state, look);
        }
    }

    /// Re-applies the selection to a freshly resolved `state`. Cached looks
    /// from the replaced state are dropped, not restored.
    pub fn reapply(&mut self, state: &mut RenderState, coincidence: &Coincidence, mode: RenderMode) {
        if let Some(selection) = self.current.take() {
            self.select(selection.key, state, coincidence, mode);
        }
    }
}
