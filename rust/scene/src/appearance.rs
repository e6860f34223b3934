// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appearance catalogue
//!
//! Exported models carry a flat list of named materials. Names ending in
//! `_Int` are the interior-face variant of the material with the same stem,
//! so the catalogue indexes every entry by a typed [`AppearanceKey`] of
//! `(stem, variant)` instead of by concatenated strings.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::keys::AppearanceId;

/// Name of the fallback appearance used when a lookup misses.
pub const UNDEFINED: &str = "Undefined";

/// Stem of the appearance used by the Normal render mode.
pub const NORMAL: &str = "NormalMaterial";

const INTERIOR_SUFFIX: &str = "_Int";

/// Linear RGB color.
///
/// Channels are nominally in `[0, 1]` but are not clamped: palette
/// regressions may overshoot slightly near their ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f64 / 255.0;
        Self::new(channel(16), channel(8), channel(0))
    }

    /// 8-bit RGBA, clamping each channel into range.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let byte = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        [byte(self.r), byte(self.g), byte(self.b), 255]
    }

    /// `#rrggbb` form of [`Color::to_rgba8`].
    pub fn to_hex_string(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Which faces of a surface an appearance paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

impl From<u8> for Side {
    fn from(value: u8) -> Self {
        match value {
            1 => Side::Back,
            2 => Side::Double,
            _ => Side::Front,
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        match side {
            Side::Front => 0,
            Side::Back => 1,
            Side::Double => 2,
        }
    }
}

/// A resolved material as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appearance {
    pub name: String,
    pub color: Color,
    pub side: Side,
    pub opacity: f64,
    pub emissive: Color,
}

/// Material entry as it appears in a scene document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppearanceRecord {
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub side: Side,
    #[serde(default = "opaque")]
    pub opacity: f64,
    #[serde(default)]
    pub emissive: u32,
}

fn opaque() -> f64 {
    1.0
}

impl From<AppearanceRecord> for Appearance {
    fn from(record: AppearanceRecord) -> Self {
        Self {
            name: record.name,
            color: Color::from_hex(record.color),
            side: record.side,
            opacity: record.opacity,
            emissive: Color::from_hex(record.emissive),
        }
    }
}

/// Plain or interior-face variant of a named appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Primary,
    Interior,
}

/// Typed catalogue key: appearance stem plus variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppearanceKey {
    pub name: String,
    pub variant: Variant,
}

impl AppearanceKey {
    pub fn primary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: Variant::Primary,
        }
    }

    pub fn interior(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variant: Variant::Interior,
        }
    }

    /// Interior alias of a document material name, if it carries the suffix.
    pub fn interior_alias(material_name: &str) -> Option<Self> {
        material_name
            .strip_suffix(INTERIOR_SUFFIX)
            .filter(|stem| !stem.is_empty())
            .map(Self::interior)
    }
}

fn neutral_undefined() -> Appearance {
    Appearance {
        name: UNDEFINED.to_string(),
        color: Color::from_hex(0x808080),
        side: Side::Double,
        opacity: 1.0,
        emissive: Color::BLACK,
    }
}

/// Named appearances indexed by [`AppearanceKey`].
///
/// Always holds an [`UNDEFINED`] entry; a neutral gray one is synthesized
/// when the document does not provide its own.
#[derive(Debug, Clone)]
pub struct AppearanceCatalogue {
    arena: SlotMap<AppearanceId, Appearance>,
    index: FxHashMap<AppearanceKey, AppearanceId>,
    undefined: AppearanceId,
}

impl Default for AppearanceCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl AppearanceCatalogue {
    pub fn new() -> Self {
        let mut arena = SlotMap::with_key();
        let undefined = arena.insert(neutral_undefined());
        let mut index = FxHashMap::default();
        index.insert(AppearanceKey::primary(UNDEFINED), undefined);
        Self {
            arena,
            index,
            undefined,
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = AppearanceRecord>) -> Self {
        let mut catalogue = Self::new();
        for record in records {
            catalogue.insert(record.into());
        }
        catalogue
    }

    /// Adds an appearance under its exact name, plus the interior alias of
    /// its stem when the name ends in `_Int`. A later entry with the same
    /// name replaces the earlier one in place and keeps its id.
    pub fn insert(&mut self, appearance: Appearance) -> AppearanceId {
        let exact = AppearanceKey::primary(appearance.name.as_str());
        let alias = AppearanceKey::interior_alias(&appearance.name);
        let id = match self.index.get(&exact) {
            Some(&id) => {
                if let Some(slot) = self.arena.get_mut(id) {
                    *slot = appearance;
                }
                id
            }
            None => {
                let id = self.arena.insert(appearance);
                self.index.insert(exact, id);
                id
            }
        };
        if let Some(alias) = alias {
            self.index.insert(alias, id);
        }
        id
    }

    pub fn lookup(&self, key: &AppearanceKey) -> Option<AppearanceId> {
        self.index.get(key).copied()
    }

    pub fn get(&self, id: AppearanceId) -> Option<&Appearance> {
        self.arena.get(id)
    }

    /// Owned copy of `id`, or of the Undefined entry when `id` is stale.
    pub fn resolve(&self, id: AppearanceId) -> Appearance {
        self.get(id)
            .or_else(|| self.get(self.undefined))
            .cloned()
            .unwrap_or_else(neutral_undefined)
    }

    pub fn undefined(&self) -> AppearanceId {
        self.undefined
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
