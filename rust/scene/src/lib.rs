// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # BemView Scene
//!
//! Data model for viewing building energy models: surface entities with
//! their exporter metadata, the typed appearance catalogue, simulation
//! output variables, and the scalar-to-color palettes used for data
//! overlays.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bemview_scene::{color, Palette, Scene};
//!
//! let scene = Scene::from_json(&std::fs::read_to_string("model.json")?)?;
//! for (_, surface) in scene.surfaces() {
//!     println!("{} ({})", surface.name(), surface.surface_type());
//! }
//! let hot = color(Some(35.0), 0.0, 40.0, Palette::Diverging);
//! ```

pub mod appearance;
pub mod error;
pub mod keys;
pub mod palette;
pub mod scene;
pub mod surface;
pub mod variable;

pub use appearance::{
    Appearance, AppearanceCatalogue, AppearanceKey, AppearanceRecord, Color, Side, Variant,
    NORMAL, UNDEFINED,
};
pub use error::{Error, Result};
pub use keys::{AppearanceId, SurfaceKey};
pub use palette::{color, normalize, Palette, UnknownPalette};
pub use scene::{BoundingSphere, Scene, SceneDocument};
pub use surface::{AppearanceNames, SurfaceEntity, SurfaceMetadata, VariableBinding};
pub use variable::Variable;
