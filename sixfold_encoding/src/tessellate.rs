// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of glyph outlines into the rough fan mesh and the curve-correction mesh.

use peniko::kurbo::{BezPath, PathEl};
use thiserror::Error;

use crate::{
    CurveVertex, FanVertex, OutlineError, OutlineSource, TextLayout, TriangleFanBuilder,
    TriangleListBuilder,
};

/// Errors that can occur while building glyph meshes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TessellationError {
    /// A fan vertex was appended before any fan was started with a move command.
    #[error("Outline segment before the first move command")]
    FanNotStarted,
    /// The fan mesh needs more vertices than 16-bit indices can address.
    #[error("Fan mesh needs {vertex_count} vertices, more than 16-bit indices can address")]
    IndexOverflow { vertex_count: usize },
    /// The outline contains a command other than move, line, quadratic curve or close.
    #[error("Unsupported outline command: {command}")]
    UnsupportedCommand { command: &'static str },
    #[error(transparent)]
    Outline(#[from] OutlineError),
}

/// The two meshes drawn by the accumulation pass.
#[derive(Clone, Debug, Default)]
pub struct GlyphMeshes {
    /// Rough coverage: one triangle fan per contour, curves replaced by their chords.
    pub fan: TriangleFanBuilder,
    /// One correction triangle per quadratic segment.
    pub curves: TriangleListBuilder,
}

impl GlyphMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fan.is_empty() && self.curves.is_empty()
    }

    /// Appends the meshes of every contour in `path`.
    ///
    /// A move starts a new fan whose first triangle is degenerate, lines and
    /// quadratic curves advance the fan to their end point, and each quadratic
    /// curve also adds the triangle (previous point, control point, end point).
    pub fn append_path(&mut self, path: &BezPath) -> Result<(), TessellationError> {
        self.append_elements(path.elements().iter().copied())
    }

    /// Like [`append_path`](Self::append_path), for any sequence of path elements.
    pub fn append_elements(
        &mut self,
        elements: impl IntoIterator<Item = PathEl>,
    ) -> Result<(), TessellationError> {
        for el in elements {
            match el {
                PathEl::MoveTo(p) => self.fan.restart(p, p)?,
                PathEl::LineTo(p) => self.fan.next_triangle(p)?,
                PathEl::QuadTo(c, p) => {
                    let prev = self
                        .fan
                        .last_vertex()
                        .ok_or(TessellationError::FanNotStarted)?;
                    self.fan.next_triangle(p)?;
                    self.curves.add_triangle(
                        CurveVertex::new(prev, CurveVertex::ST_START),
                        CurveVertex::new(FanVertex::from(c), CurveVertex::ST_CONTROL),
                        CurveVertex::new(FanVertex::from(p), CurveVertex::ST_END),
                    );
                }
                PathEl::CurveTo(..) => {
                    return Err(TessellationError::UnsupportedCommand {
                        command: "cubic curve",
                    })
                }
                PathEl::ClosePath => {}
            }
        }
        Ok(())
    }
}

/// Walks the outline of a string for every line of a [`TextLayout`].
#[derive(Clone, Debug, Default)]
pub struct GlyphTessellator {
    layout: TextLayout,
    path: BezPath,
}

impl GlyphTessellator {
    pub fn new(layout: TextLayout) -> Self {
        Self {
            layout,
            path: BezPath::new(),
        }
    }

    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: TextLayout) {
        self.layout = layout;
    }

    /// Builds the meshes of `text` drawn once per line of the layout.
    ///
    /// Any unsupported command aborts the whole string, since partial glyph
    /// geometry would render incorrectly.
    pub fn tessellate(
        &mut self,
        source: &impl OutlineSource,
        text: &str,
    ) -> Result<GlyphMeshes, TessellationError> {
        let mut meshes = GlyphMeshes::new();
        for line in self.layout.lines() {
            self.path.truncate(0);
            source.append_outline(text, line.font_size, line.baseline, &mut self.path)?;
            meshes.append_path(&self.path)?;
        }
        log::debug!(
            "Tessellated {:?}: {} fan triangles ({} vertices), {} curve triangles",
            text,
            meshes.fan.triangle_count(),
            meshes.fan.vertex_count(),
            meshes.curves.triangle_count(),
        );
        Ok(meshes)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use peniko::kurbo::{BezPath, Point};

    use super::*;

    /// Draws every character as a `0.2 * size` by `0.7 * size` box on the baseline.
    #[derive(Default)]
    struct BoxGlyphs {
        calls: RefCell<Vec<(f32, Point)>>,
    }

    impl OutlineSource for BoxGlyphs {
        fn append_outline(
            &self,
            text: &str,
            font_size: f32,
            origin: Point,
            path: &mut BezPath,
        ) -> Result<(), OutlineError> {
            self.calls.borrow_mut().push((font_size, origin));
            let size = f64::from(font_size);
            for (i, _) in text.chars().enumerate() {
                let x = origin.x + i as f64 * 0.5 * size;
                let (w, h) = (0.2 * size, 0.7 * size);
                path.move_to((x, origin.y));
                path.line_to((x, origin.y - h));
                path.line_to((x + w, origin.y - h));
                path.line_to((x + w, origin.y));
                path.line_to((x, origin.y));
                path.close_path();
            }
            Ok(())
        }
    }

    #[test]
    fn polygon_outline_has_no_curves() {
        let mut path = BezPath::new();
        let points = [(0., 0.), (10., 0.), (10., 10.), (5., 15.), (0., 10.)];
        path.move_to(points[0]);
        for &p in &points[1..] {
            path.line_to(p);
        }
        path.close_path();

        let mut meshes = GlyphMeshes::new();
        meshes.append_path(&path).unwrap();
        assert!(meshes.curves.is_empty());
        assert_eq!(meshes.fan.triangle_count(), 4);
        for v in meshes.fan.vertices() {
            let p = (f64::from(v.pos[0]), f64::from(v.pos[1]));
            assert!(points.contains(&p), "{p:?} is not an input point");
        }
        // The zeroth triangle of a contour is degenerate.
        let first = meshes.fan.triangles().next().unwrap();
        let v = meshes.fan.vertices();
        assert_eq!(v[first[0] as usize], v[first[1] as usize]);
    }

    #[test]
    fn quad_adds_one_correction_triangle() {
        let mut path = BezPath::new();
        path.move_to((0., 0.));
        path.line_to((10., 0.));
        path.quad_to((15., 5.), (10., 10.));
        path.close_path();

        let mut meshes = GlyphMeshes::new();
        meshes.append_path(&path).unwrap();
        assert_eq!(meshes.fan.triangle_count(), 2);
        assert_eq!(meshes.curves.triangle_count(), 1);
        let [a, b, c] = meshes.curves.triangles().next().unwrap();
        assert_eq!(a.pos, [10., 0.]);
        assert_eq!(b.pos, [15., 5.]);
        assert_eq!(c.pos, [10., 10.]);
        assert_eq!(a.st, [0., 0.]);
        assert_eq!(b.st, [0.5, 0.]);
        assert_eq!(c.st, [1., 1.]);
        // The rough mesh uses the chord.
        assert_eq!(meshes.fan.vertices().last().unwrap().pos, [10., 10.]);
    }

    #[test]
    fn quad_after_move_uses_move_target() {
        let mut path = BezPath::new();
        path.move_to((3., 4.));
        path.quad_to((5., 0.), (7., 4.));
        let mut meshes = GlyphMeshes::new();
        meshes.append_path(&path).unwrap();
        let [a, ..] = meshes.curves.triangles().next().unwrap();
        assert_eq!(a.pos, [3., 4.]);
    }

    #[test]
    fn cubic_is_rejected() {
        let mut path = BezPath::new();
        path.move_to((0., 0.));
        path.curve_to((1., 1.), (2., 1.), (3., 0.));
        let err = GlyphMeshes::new().append_path(&path).unwrap_err();
        assert!(matches!(err, TessellationError::UnsupportedCommand { .. }));
    }

    #[test]
    fn segment_before_move_is_rejected() {
        let err = GlyphMeshes::new()
            .append_elements([PathEl::LineTo((1., 1.).into())])
            .unwrap_err();
        assert!(matches!(err, TessellationError::FanNotStarted));

        let err = GlyphMeshes::new()
            .append_elements([PathEl::QuadTo((1., 1.).into(), (2., 0.).into())])
            .unwrap_err();
        assert!(matches!(err, TessellationError::FanNotStarted));
    }

    #[test]
    fn one_outline_request_per_line() {
        let source = BoxGlyphs::default();
        let mut tessellator = GlyphTessellator::new(TextLayout::default());
        let meshes = tessellator.tessellate(&source, "ab").unwrap();
        let calls = source.calls.borrow();
        assert_eq!(calls.len(), 9);
        assert_eq!(calls[0], (150., Point::new(10., 150.)));
        assert_eq!(calls[1], (72., Point::new(10., 310.)));
        // 2 glyphs per line, 6 vertices and 4 triangles per glyph.
        assert_eq!(meshes.fan.vertex_count(), 9 * 2 * 6);
        assert_eq!(meshes.fan.triangle_count(), 9 * 2 * 4);
        assert!(meshes.curves.is_empty());
    }

    #[test]
    fn single_rectangle_glyph() {
        let source = BoxGlyphs::default();
        let mut tessellator = GlyphTessellator::new(TextLayout::single_line(100.));
        let meshes = tessellator.tessellate(&source, "I").unwrap();
        assert_eq!(meshes.fan.vertex_count(), 6);
        assert_eq!(meshes.fan.triangle_count(), 4);
        assert_eq!(meshes.curves.vertex_count(), 0);
    }

    #[test]
    fn outline_errors_propagate() {
        struct Broken;
        impl OutlineSource for Broken {
            fn append_outline(
                &self,
                _: &str,
                _: f32,
                _: Point,
                _: &mut BezPath,
            ) -> Result<(), OutlineError> {
                Err(OutlineError::Font("truncated".into()))
            }
        }
        let err = GlyphTessellator::default()
            .tessellate(&Broken, "x")
            .unwrap_err();
        assert!(matches!(err, TessellationError::Outline(_)));
    }
}
