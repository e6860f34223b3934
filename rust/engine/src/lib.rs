// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BemView Engine
//!
//! Render-state engine for a building energy model viewer. Given a loaded
//! [`Scene`](bemview_scene::Scene) it decides, for every surface, whether it
//! is drawn and with which appearance, and it drives navigation, picking and
//! the data legend.
//!
//! ## Overview
//!
//! - **Coincidence**: partner surfaces, back-face ghosts and edge overlays,
//!   derived once per scene
//! - **Materials**: the two-stage resolver over eight render modes
//! - **Binder**: time-series values and labels for Data mode
//! - **Navigation**: perspective and orthographic rigs with eased orbits
//! - **Selection**: click picking with exact highlight restoration
//! - **Legend**: palette raster, labels, value cursor and placement
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bemview_engine::{MemoryPreferences, RenderMode, ViewerConfig, ViewerState, Viewport};
//! use bemview_scene::Scene;
//!
//! let scene = Scene::from_json(&std::fs::read_to_string("model.json")?)?;
//! let mut viewer = ViewerState::new(
//!     scene,
//!     ViewerConfig::from_env(),
//!     Box::new(MemoryPreferences::new()),
//!     Viewport::new(1280.0, 720.0),
//! );
//! viewer.set_mode(RenderMode::ThermalZone)?;
//!
//! // every frame
//! viewer.tick(1.0 / 60.0);
//! for item in viewer.draw_list() {
//!     // hand to the renderer
//! }
//! ```

pub mod binder;
pub mod coincidence;
pub mod config;
pub mod error;
pub mod legend;
pub mod materials;
pub mod mode;
pub mod navigation;
pub mod preferences;
pub mod readout;
pub mod selection;
pub mod settings;
pub mod viewer;

pub use binder::{absolute_index, format_timestamp, DataSample, HourCycle, TimeSlice};
pub use coincidence::{Coincidence, EdgeOverlay, EdgeStyle, Ghost};
pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use legend::{LegendCursor, LegendLabels, LegendPlacement};
pub use materials::{RenderState, SurfaceAppearance, SurfaceState};
pub use mode::RenderMode;
pub use navigation::{AxisLine, OrbitController, OrbitPreset};
pub use preferences::{MemoryPreferences, PreferenceError, PreferenceStore};
pub use readout::{InfoReadout, ReadoutBody};
pub use selection::{PointerTracker, SelectionController};
pub use settings::{Category, CategoryFilters, Settings, StoryFilter};
pub use viewer::{DrawItem, ViewerState, Viewport};
