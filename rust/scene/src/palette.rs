// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar-to-color palettes for data overlays.
//!
//! Each palette is a closed-form regression per channel over the normalized
//! value. The input is clamped to the variable's range but the resulting
//! channels are not, so the regressions may leave `[0, 1]` slightly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::appearance::Color;

/// A continuous color map over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// Linear white-to-black ramp.
    Grayscale,
    Sequential,
    #[default]
    Diverging,
    Rainbow,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Grayscale,
        Palette::Sequential,
        Palette::Diverging,
        Palette::Rainbow,
    ];

    /// Name used in preferences and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Grayscale => "grayscale",
            Palette::Sequential => "sequential",
            Palette::Diverging => "diverging",
            Palette::Rainbow => "rainbow",
        }
    }

    /// Parses a palette name; unknown names mean grayscale.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Palette::Grayscale)
    }

    /// Evaluates the palette at a normalized position.
    pub fn evaluate(&self, p: f64) -> Color {
        match self {
            Palette::Grayscale => Color::new(1.0 - p, 1.0 - p, 1.0 - p),
            Palette::Sequential => Color::new(
                1.0 - 0.392 * (1.0 + erf((p - 0.869) / 0.255)),
                1.021 - 0.456 * (1.0 + erf((p - 0.527) / 0.376)),
                1.0 - 0.493 * (1.0 + erf((p - 0.272) / 0.309)),
            ),
            Palette::Diverging => Color::new(
                poly(p, &[0.237, -2.13, 26.92, -65.5, 63.5, -22.36]),
                (poly(p, &[0.572, 1.524, -1.811]) / poly(p, &[1.0, -0.291, 0.1574])).powi(2),
                1.0 / poly(p, &[1.579, -4.03, 12.92, -31.4, 48.6, -23.36]),
            ),
            Palette::Rainbow => Color::new(
                poly(p, &[0.472, -0.567, 4.05]) / poly(p, &[1.0, 8.72, -19.17, 14.1]),
                poly(
                    p,
                    &[0.108932, -1.22635, 27.284, -98.577, 163.3, -131.395, 40.634],
                ),
                1.0 / poly(p, &[1.97, 3.54, -68.5, 243.0, -297.0, 125.0]),
            ),
        }
    }
}

impl FromStr for Palette {
    type Err = UnknownPalette;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPalette(s.to_string()))
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Palette::from_str`] for an unrecognized name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown palette: {0}")]
pub struct UnknownPalette(pub String);

/// Maps `x` within `[min, max]` to a color.
///
/// An absent value maps to white. `x` is clamped into the range first; a
/// zero-width range places every value at the low end.
pub fn color(x: Option<f64>, min: f64, max: f64, palette: Palette) -> Color {
    match x {
        None => Color::WHITE,
        Some(x) => palette.evaluate(normalize(x, min, max)),
    }
}

/// Position of `x` within `[min, max]` after clamping, in `[0, 1]`.
pub fn normalize(x: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    // min/max rather than clamp: clamp panics when min > max
    let x = x.max(min).min(max);
    (x - min) / span
}

/// Horner evaluation, coefficients in ascending order.
#[inline]
fn poly(x: f64, coefficients: &[f64]) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Error function, Abramowitz and Stegun formula 7.1.26.
fn erf(x: f64) -> f64 {
    const A1: f64 = 0.254829592;
    const A2: f64 = -0.284496736;
    const A3: f64 = 1.421413741;
    const A4: f64 = -1.453152027;
    const A5: f64 = 1.061405429;
    const P: f64 = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - poly(t, &[0.0, A1, A2, A3, A4, A5]) * (-x * x).exp();
    sign * y
}
