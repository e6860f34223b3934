// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted user preferences.
//!
//! The viewer reads and writes a handful of UI choices through an opaque
//! key/value store. Store failures never reach the caller: reads fall back
//! to the supplied default and writes are dropped.

use std::fmt::Display;

use rustc_hash::FxHashMap;
use tracing::debug;

pub const SHOW_FLOORS: &str = "showFloors";
pub const SHOW_WALLS: &str = "showWalls";
pub const SHOW_ROOF_CEILINGS: &str = "showRoofCeilings";
pub const SHOW_WINDOWS: &str = "showWindows";
pub const SHOW_DOORS: &str = "showDoors";
pub const SHOW_SHADING: &str = "showShading";
pub const SHOW_PARTITIONS: &str = "showPartitions";
pub const SHOW_WIREFRAME: &str = "showWireframe";
pub const ORTHOGRAPHIC: &str = "orthographic";
pub const COLOR_SCHEME: &str = "colorScheme";
pub const CYCLE_SPEED: &str = "cycleSpeed";
pub const ROTATE_COLOR_BAR: &str = "rotateColorBar";
pub const COLOR_BAR_TOP: &str = "colorBarTop";
pub const COLOR_BAR_LEFT: &str = "colorBarLeft";

/// Failure reported by a preference backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("preference store unavailable: {0}")]
    Unavailable(String),

    #[error("preference {key} rejected: {reason}")]
    Rejected { key: String, reason: String },
}

/// Key/value persistence backend.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Stored string, or `default` when missing or unreadable.
pub fn get_string(store: &dyn PreferenceStore, key: &str, default: &str) -> String {
    match store.get(key) {
        Ok(Some(value)) => value,
        _ => default.to_string(),
    }
}

/// Stored flag; any stored value other than `"true"` reads as false.
pub fn get_bool(store: &dyn PreferenceStore, key: &str, default: bool) -> bool {
    match store.get(key) {
        Ok(Some(value)) => value == "true",
        _ => default,
    }
}

/// Stored number, or `default` when missing, unreadable or not a number.
pub fn get_float(store: &dyn PreferenceStore, key: &str, default: f64) -> f64 {
    match store.get(key) {
        Ok(Some(value)) => value.trim().parse().unwrap_or(default),
        _ => default,
    }
}

/// Writes a value, ignoring store failures.
pub fn set_value(store: &mut dyn PreferenceStore, key: &str, value: impl Display) {
    if let Err(error) = store.set(key, &value.to_string()) {
        debug!(key, %error, "preference not saved");
    }
}

/// In-memory store, used by tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: FxHashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Display) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
