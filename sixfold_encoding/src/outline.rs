// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sources of glyph outlines.

use peniko::kurbo::{BezPath, Point};
use thiserror::Error;

/// Errors reported by an [`OutlineSource`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OutlineError {
    /// The font data could not be parsed.
    #[error("Couldn't read font: {0}")]
    Font(String),
    /// A glyph outline could not be drawn.
    #[error("Couldn't draw outline of glyph for {ch:?}: {message}")]
    Draw { ch: char, message: String },
}

/// Provides the outline of a whole string, laid out on a single line.
///
/// Outlines are in pixel space with y pointing down, so that `origin` is the
/// left end of the baseline and ascenders have smaller y values than it.
pub trait OutlineSource {
    /// Appends the outline of `text` at `font_size` pixels per em to `path`.
    fn append_outline(
        &self,
        text: &str,
        font_size: f32,
        origin: Point,
        path: &mut BezPath,
    ) -> Result<(), OutlineError>;
}

impl<T: OutlineSource + ?Sized> OutlineSource for &T {
    fn append_outline(
        &self,
        text: &str,
        font_size: f32,
        origin: Point,
        path: &mut BezPath,
    ) -> Result<(), OutlineError> {
        (**self).append_outline(text, font_size, origin, path)
    }
}

#[cfg(feature = "skrifa")]
pub use self::skrifa_source::SkrifaOutlines;

#[cfg(feature = "skrifa")]
mod skrifa_source {
    use peniko::kurbo::{BezPath, Point};
    use skrifa::instance::{LocationRef, Size};
    use skrifa::outline::{DrawSettings, OutlinePen};
    use skrifa::{FontRef, MetadataProvider};

    use super::{OutlineError, OutlineSource};

    /// Outlines from a TrueType (or OpenType) font, via skrifa.
    ///
    /// Glyphs are placed by their unhinted advance widths; there is no shaping
    /// or kerning. Fonts with cubic outlines (CFF) are read, but the tessellator
    /// rejects their curves.
    #[derive(Clone)]
    pub struct SkrifaOutlines<'a> {
        font: FontRef<'a>,
    }

    impl<'a> SkrifaOutlines<'a> {
        pub fn new(data: &'a [u8]) -> Result<Self, OutlineError> {
            Self::from_index(data, 0)
        }

        /// Reads font number `index` of a font collection.
        pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, OutlineError> {
            let font = FontRef::from_index(data, index)
                .map_err(|err| OutlineError::Font(err.to_string()))?;
            Ok(Self { font })
        }
    }

    impl std::fmt::Debug for SkrifaOutlines<'_> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SkrifaOutlines").finish_non_exhaustive()
        }
    }

    impl OutlineSource for SkrifaOutlines<'_> {
        fn append_outline(
            &self,
            text: &str,
            font_size: f32,
            origin: Point,
            path: &mut BezPath,
        ) -> Result<(), OutlineError> {
            let size = Size::new(font_size);
            let location = LocationRef::default();
            let charmap = self.font.charmap();
            let metrics = self.font.glyph_metrics(size, location);
            let outlines = self.font.outline_glyphs();
            let mut pen_x = origin.x;
            for ch in text.chars() {
                let gid = charmap.map(ch).unwrap_or_default();
                if let Some(outline) = outlines.get(gid) {
                    let mut pen = PixelPen {
                        path: &mut *path,
                        origin: Point::new(pen_x, origin.y),
                    };
                    outline
                        .draw(DrawSettings::unhinted(size, location), &mut pen)
                        .map_err(|err| OutlineError::Draw {
                            ch,
                            message: err.to_string(),
                        })?;
                }
                pen_x += f64::from(metrics.advance_width(gid).unwrap_or_default());
            }
            Ok(())
        }
    }

    /// Note that we flip the y-axis to match our coordinate system.
    struct PixelPen<'a> {
        path: &'a mut BezPath,
        origin: Point,
    }

    impl PixelPen<'_> {
        fn map(&self, x: f32, y: f32) -> Point {
            Point::new(self.origin.x + f64::from(x), self.origin.y - f64::from(y))
        }
    }

    impl OutlinePen for PixelPen<'_> {
        fn move_to(&mut self, x: f32, y: f32) {
            let p = self.map(x, y);
            self.path.move_to(p);
        }

        fn line_to(&mut self, x: f32, y: f32) {
            let p = self.map(x, y);
            self.path.line_to(p);
        }

        fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
            let (c, p) = (self.map(cx0, cy0), self.map(x, y));
            self.path.quad_to(c, p);
        }

        fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
            let (c0, c1, p) = (self.map(cx0, cy0), self.map(cx1, cy1), self.map(x, y));
            self.path.curve_to(c0, c1, p);
        }

        fn close(&mut self) {
            self.path.close_path();
        }
    }
}
