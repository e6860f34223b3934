// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time-series binding
//!
//! Maps the day and hour controls to an absolute interval of the active
//! variable, labels that interval from the variable's time array, and reads
//! each surface's value at it. Intervals outside the recorded range are not
//! validated here: they simply produce absent values and empty labels.

use bemview_scene::{Scene, SurfaceMetadata, Variable};
use chrono::DateTime;
use serde::Serialize;

/// Absolute interval index for a day and 1-based hour.
///
/// `floor(intervals_per_day * floor(day) + intervals_per_hour * floor(hour)) - 1`,
/// or `None` when that falls before the first interval.
pub fn absolute_index(variable: &Variable, day: f64, hour: f64) -> Option<usize> {
    let index = (variable.intervals_per_day * day.floor()
        + variable.intervals_per_hour * hour.floor())
    .floor()
        - 1.0;
    (index >= 0.0 && index.is_finite()).then_some(index as usize)
}

/// `("MM/DD", "HH:MM")` in UTC for a timestamp in epoch seconds.
pub fn format_timestamp(seconds: f64) -> Option<(String, String)> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9) as u32;
    let at = DateTime::from_timestamp(whole as i64, nanos)?;
    Some((at.format("%m/%d").to_string(), at.format("%H:%M").to_string()))
}

/// A surface's reading at the selected interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSample {
    pub variable: String,
    pub key_name: String,
    pub date: String,
    pub time: String,
    /// Absent is distinct from zero.
    pub value: Option<f64>,
    /// `(units)` or empty.
    pub units: String,
}

/// The active variable at one interval.
#[derive(Debug, Clone)]
pub struct TimeSlice<'a> {
    pub variable: &'a Variable,
    pub interval: Option<usize>,
    pub date: String,
    pub time: String,
}

impl<'a> TimeSlice<'a> {
    pub fn new(scene: &Scene, variable: &'a Variable, day: f64, hour: f64) -> Self {
        let interval = absolute_index(variable, day, hour);
        let (date, time) = interval
            .and_then(|i| scene.timestamp(variable, i))
            .and_then(format_timestamp)
            .unwrap_or_default();
        Self {
            variable,
            interval,
            date,
            time,
        }
    }

    /// `MM/DD - HH:MM`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.date, self.time)
    }

    pub fn value_for(&self, metadata: &SurfaceMetadata) -> Option<f64> {
        let row = metadata.binding(&self.variable.name)?.value_index?;
        self.variable.value(row, self.interval?)
    }

    pub fn sample(&self, metadata: &SurfaceMetadata) -> DataSample {
        let binding = metadata.binding(&self.variable.name);
        DataSample {
            variable: self.variable.name.clone(),
            key_name: binding
                .and_then(|b| b.key_name.clone())
                .unwrap_or_default(),
            date: self.date.clone(),
            time: self.time.clone(),
            value: self.value_for(metadata),
            units: self.variable.units_label(),
        }
    }
}

/// Steps the hour slider while hour cycling is on.
#[derive(Debug, Clone, Default)]
pub struct HourCycle {
    elapsed: f64,
}

/// Hour after `hour` on a 1..=24 dial.
pub fn next_hour(hour: f64) -> f64 {
    hour % 24.0 + 1.0
}

impl HourCycle {
    /// Accumulates `dt` seconds and advances `hour` once per `1 / speed`
    /// seconds. Returns the number of steps taken.
    pub fn advance(&mut self, dt: f64, speed: f64, hour: &mut f64) -> u32 {
        if speed <= 0.0 || !speed.is_finite() {
            return 0;
        }
        let period = 1.0 / speed;
        self.elapsed += dt.max(0.0);
        let mut steps = 0;
        while self.elapsed >= period {
            self.elapsed -= period;
            *hour = next_hour(*hour);
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
