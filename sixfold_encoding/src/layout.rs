// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Point;

/// Vertical stacking of the rendered lines: the same string is drawn once per
/// font size, each line below the previous one.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout {
    /// Font size of each line, in pixels per em, top to bottom.
    pub font_sizes: Vec<f32>,
    /// Horizontal position of the start of every baseline.
    pub origin_x: f32,
    /// Extra space between lines, in addition to the font size of the line above.
    pub line_gap: f32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            font_sizes: vec![150., 72., 54., 48., 40., 32., 24., 16., 12.],
            origin_x: 10.,
            line_gap: 10.,
        }
    }
}

/// Where a single line is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePlacement {
    pub font_size: f32,
    pub baseline: Point,
}

impl TextLayout {
    /// A layout drawing one line at `font_size`.
    pub fn single_line(font_size: f32) -> Self {
        Self {
            font_sizes: vec![font_size],
            ..Self::default()
        }
    }

    /// Placement of each line.
    ///
    /// The first baseline sits one (first) font size below the top, each
    /// following baseline is advanced by the size of the line above plus `line_gap`.
    pub fn lines(&self) -> impl Iterator<Item = LinePlacement> + '_ {
        let mut y = self.font_sizes.first().copied().unwrap_or_default();
        self.font_sizes.iter().map(move |&font_size| {
            let line = LinePlacement {
                font_size,
                baseline: Point::new(f64::from(self.origin_x), f64::from(y)),
            };
            y += font_size + self.line_gap;
            line
        })
    }
}
