// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulation output variables.

use serde::{Deserialize, Serialize};

fn one() -> f64 {
    1.0
}

fn one_day() -> u32 {
    1
}

/// One time-varying output variable.
///
/// `values[row][interval]` holds the value of the surface bound to `row`
/// at absolute interval `interval`. Missing samples are `None` and are
/// distinct from zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub units: String,
    pub value_min: f64,
    pub value_max: f64,
    #[serde(default)]
    pub values: Vec<Vec<Option<f64>>>,
    pub intervals_per_day: f64,
    pub intervals_per_hour: f64,
    #[serde(default = "one")]
    pub hours_per_interval: f64,
    #[serde(default = "one_day")]
    pub num_days: u32,
    /// Which of the scene's time arrays this variable is sampled on.
    #[serde(default)]
    pub time_index: usize,
}

impl Variable {
    /// Sample at `row`, `interval`; absent when either is out of range.
    pub fn value(&self, row: usize, interval: usize) -> Option<f64> {
        self.values.get(row)?.get(interval).copied().flatten()
    }

    /// `(units)` suffix for display, empty when the variable is unitless.
    pub fn units_label(&self) -> String {
        if self.units.is_empty() {
            String::new()
        } else {
            format!("({})", self.units)
        }
    }
}
