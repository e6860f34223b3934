// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Legend (color bar)
//!
//! The legend is a `width × height` RGBA raster of the active palette, a
//! pair of min/max labels, an optional cursor marking the selected
//! surface's value, and a draggable container that is kept inside the
//! window.

use std::path::Path;

use bemview_scene::{color, Palette};
use image::{Rgba, RgbaImage};
use serde::Serialize;

use crate::error::Result;

/// Horizontal padding of the legend container around the raster.
const CONTAINER_PAD_X: f64 = 42.0;
/// Vertical padding of the legend container (labels and title).
const CONTAINER_PAD_Y: f64 = 112.0;
/// Offset of the cursor line from the container edge.
const CURSOR_LINE_OFFSET: f64 = 20.0;
/// Offset of the cursor label from the container edge.
const CURSOR_LABEL_OFFSET: f64 = 10.0;

/// Renders `palette` left to right into a `width × height` raster.
///
/// Column `i` is `color(i, 0, width - 1)`; every row is identical. Channel
/// overshoot is clamped here, when converting to bytes.
pub fn raster(palette: Palette, width: u32, height: u32) -> RgbaImage {
    let last = f64::from(width.saturating_sub(1));
    let columns: Vec<Rgba<u8>> = (0..width)
        .map(|i| Rgba(color(Some(f64::from(i)), 0.0, last, palette).to_rgba8()))
        .collect();
    RgbaImage::from_fn(width, height, |x, _| columns[x as usize])
}

/// Writes a legend raster as PNG.
pub fn save_png(image: &RgbaImage, path: impl AsRef<Path>) -> Result<()> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Rounds to two decimals, halves towards positive infinity.
pub fn round2(x: f64) -> f64 {
    let rounded = (x * 100.0 + 0.5).floor() / 100.0;
    // -0.001 should read as 0, not -0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Text of a legend value label.
pub fn format_value(x: f64) -> String {
    format!("{}", round2(x))
}

/// Min and max labels drawn under the raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendLabels {
    pub min: String,
    pub max: String,
}

pub fn labels(min: f64, max: f64) -> LegendLabels {
    LegendLabels {
        min: format_value(min),
        max: format_value(max),
    }
}

/// Marker for the selected surface's value on the legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendCursor {
    /// Position along the value axis; not clamped, so out-of-range values
    /// land outside the bar.
    pub percent: f64,
    /// Pixel offset of the marker line.
    pub line_offset: f64,
    /// Pixel offset of the marker label.
    pub label_offset: f64,
    pub label: String,
}

/// Cursor for `value` on a legend of `width` pixels, or `None` when there
/// is no value to mark.
pub fn cursor(value: Option<f64>, min: f64, max: f64, width: u32) -> Option<LegendCursor> {
    let value = value?;
    let span = max - min;
    let percent = if span == 0.0 || !span.is_finite() {
        0.0
    } else {
        (value - min) / span
    };
    let along = f64::from(width) * percent;
    Some(LegendCursor {
        percent,
        line_offset: CURSOR_LINE_OFFSET + along,
        label_offset: CURSOR_LABEL_OFFSET + along,
        label: format_value(value),
    })
}

/// Screen position of the legend container's top-left corner, in pixels.
///
/// When the legend is rotated the container is turned a quarter about its
/// center, so its visual box is offset by half its unrotated width.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LegendPlacement {
    pub top: f64,
    pub left: f64,
}

impl LegendPlacement {
    pub fn new(top: f64, left: f64) -> Self {
        Self { top, left }
    }

    /// Unrotated container size `(width, height)` for a raster size.
    pub fn container_size(legend_width: u32, legend_height: u32) -> (f64, f64) {
        (
            f64::from(legend_width) + CONTAINER_PAD_X,
            f64::from(legend_height) + CONTAINER_PAD_Y,
        )
    }

    /// Moves the container back inside a `window_width × window_height`
    /// window if any edge sticks out. Left and top win over right and
    /// bottom when the window is too small.
    pub fn fit_in_window(
        &mut self,
        window_width: f64,
        window_height: f64,
        legend_width: u32,
        legend_height: u32,
        rotated: bool,
    ) {
        let (w, h) = Self::container_size(legend_width, legend_height);
        if !rotated {
            if self.left < 0.0 {
                self.left = 0.0;
            } else if window_width < self.left + w {
                self.left = window_width - w;
            }
            if self.top < 0.0 {
                self.top = 0.0;
            } else if window_height < self.top + h {
                self.top = window_height - h;
            }
            return;
        }

        let half = w / 2.0;
        let (visual_w, visual_h) = (h, w);
        let visual_left = self.left + half;
        let visual_top = self.top - half;
        if visual_left < 0.0 {
            self.left = -half;
        } else if window_width < visual_left + visual_w {
            self.left = window_width - visual_w - half;
        }
        if visual_top < 0.0 {
            self.top = half;
        } else if window_height < visual_top + visual_h {
            self.top = window_height - visual_h + half;
        }
    }

    /// Applies a drag offset.
    pub fn drop_by(&mut self, dx: f64, dy: f64) {
        self.left += dx;
        self.top += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn raster_spans_palette_and_repeats_rows() {
        let image = raster(Palette::Grayscale, 256, 4);
        assert_eq!(image.dimensions(), (256, 4));
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(255, 0).0, [0, 0, 0, 255]);
        for y in 1..4 {
            assert_eq!(image.get_pixel(100, y), image.get_pixel(100, 0));
        }
    }

    #[test]
    fn single_column_raster_does_not_divide_by_zero() {
        let image = raster(Palette::Diverging, 1, 1);
        assert_eq!(image.get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn labels_round_to_two_decimals() {
        assert_eq!(labels(-12.3456, 2.0), LegendLabels {
            min: "-12.35".into(),
            max: "2".into(),
        });
        assert_eq!(format_value(-0.001), "0");
        assert_eq!(format_value(1.005e3), "1005");
    }

    #[test]
    fn cursor_tracks_value_without_clamping() {
        let c = cursor(Some(25.0), 0.0, 100.0, 256).unwrap();
        assert_relative_eq!(c.percent, 0.25);
        assert_relative_eq!(c.line_offset, 20.0 + 64.0);
        assert_relative_eq!(c.label_offset, 10.0 + 64.0);
        assert_eq!(c.label, "25");

        let over = cursor(Some(150.0), 0.0, 100.0, 256).unwrap();
        assert_relative_eq!(over.percent, 1.5);

        assert!(cursor(None, 0.0, 100.0, 256).is_none());
        assert_eq!(cursor(Some(3.0), 3.0, 3.0, 256).unwrap().percent, 0.0);
    }

    #[test]
    fn fit_pulls_container_back_into_window() {
        // container is 298 × 152 for a 256 × 40 raster
        let mut p = LegendPlacement::new(-5.0, 900.0);
        p.fit_in_window(1000.0, 800.0, 256, 40, false);
        assert_eq!(p, LegendPlacement::new(0.0, 702.0));

        let mut p = LegendPlacement::new(700.0, -1.0);
        p.fit_in_window(1000.0, 800.0, 256, 40, false);
        assert_eq!(p, LegendPlacement::new(648.0, 0.0));

        let mut p = LegendPlacement::new(10.0, 10.0);
        p.fit_in_window(1000.0, 800.0, 256, 40, false);
        assert_eq!(p, LegendPlacement::new(10.0, 10.0));
    }

    #[test]
    fn fit_accounts_for_rotation() {
        // rotated: visual box 152 wide, 298 tall, shifted by 149
        let mut p = LegendPlacement::new(0.0, -200.0);
        p.fit_in_window(1000.0, 800.0, 256, 40, true);
        assert_eq!(p, LegendPlacement::new(149.0, -149.0));

        let mut p = LegendPlacement::new(700.0, 900.0);
        p.fit_in_window(1000.0, 800.0, 256, 40, true);
        assert_eq!(p.left, 1000.0 - 152.0 - 149.0);
        assert_eq!(p.top, 800.0 - 298.0 + 149.0);
    }

    #[test]
    fn drop_moves_by_offset() {
        let mut p = LegendPlacement::new(10.0, 20.0);
        p.drop_by(5.0, -3.0);
        assert_eq!(p, LegendPlacement::new(7.0, 25.0));
    }

    #[test]
    fn png_export_round_trips_dimensions() {
        let path = std::env::temp_dir().join("bemview-legend-test.png");
        save_png(&raster(Palette::Rainbow, 16, 2), &path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (16, 2));
        let _ = std::fs::remove_file(path);
    }
}
