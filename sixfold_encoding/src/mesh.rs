// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Append-only vertex/index builders for the two glyph meshes.

use bytemuck::{Pod, Zeroable};
use peniko::kurbo::Point;

use crate::TessellationError;

/// Vertex of the rough triangle-fan mesh.
///
/// This must be kept in sync with the vertex input of `vs_fan` in `shader/accumulate.wgsl`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct FanVertex {
    pub pos: [f32; 2],
}

impl FanVertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { pos: [x, y] }
    }
}

impl From<Point> for FanVertex {
    fn from(p: Point) -> Self {
        Self::new(p.x as f32, p.y as f32)
    }
}

/// Vertex of the curve-correction mesh: a position plus the `(s, t)` coordinate
/// used by the fragment stage to evaluate `s * s > t`.
///
/// This must be kept in sync with the vertex input of `vs_curve` in `shader/accumulate.wgsl`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct CurveVertex {
    pub pos: [f32; 2],
    pub st: [f32; 2],
}

impl CurveVertex {
    /// `(s, t)` of the segment start point.
    pub const ST_START: [f32; 2] = [0.0, 0.0];
    /// `(s, t)` of the control point.
    pub const ST_CONTROL: [f32; 2] = [0.5, 0.0];
    /// `(s, t)` of the segment end point.
    pub const ST_END: [f32; 2] = [1.0, 1.0];

    pub fn new(pos: impl Into<FanVertex>, st: [f32; 2]) -> Self {
        Self {
            pos: pos.into().pos,
            st,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct FanState {
    anchor: u16,
    last: u16,
}

/// Builds indexed triangle fans, one fan per contour.
///
/// Indices are 16 bit, so the builder holds at most 65536 vertices. Growing past
/// that is reported as [`TessellationError::IndexOverflow`] rather than wrapping.
#[derive(Clone, Debug, Default)]
pub struct TriangleFanBuilder {
    fan: Option<FanState>,
    vertices: Vec<FanVertex>,
    indices: Vec<u16>,
}

impl TriangleFanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new fan anchored at `v0`, with `v1` as its first edge vertex.
    pub fn restart(
        &mut self,
        v0: impl Into<FanVertex>,
        v1: impl Into<FanVertex>,
    ) -> Result<(), TessellationError> {
        let anchor = self.index_at(0)?;
        let last = self.index_at(1)?;
        self.vertices.push(v0.into());
        self.vertices.push(v1.into());
        self.fan = Some(FanState { anchor, last });
        Ok(())
    }

    /// Appends `next` and emits the triangle `(anchor, last, next)`.
    pub fn next_triangle(&mut self, next: impl Into<FanVertex>) -> Result<(), TessellationError> {
        let ix = self.index_at(0)?;
        let Some(fan) = self.fan.as_mut() else {
            return Err(TessellationError::FanNotStarted);
        };
        self.vertices.push(next.into());
        self.indices.extend_from_slice(&[fan.anchor, fan.last, ix]);
        fan.last = ix;
        Ok(())
    }

    fn index_at(&self, offset: usize) -> Result<u16, TessellationError> {
        let ix = self.vertices.len() + offset;
        u16::try_from(ix).map_err(|_| TessellationError::IndexOverflow {
            vertex_count: ix + 1,
        })
    }

    /// The last vertex appended to the current fan, if a fan has been started.
    pub fn last_vertex(&self) -> Option<FanVertex> {
        let fan = self.fan?;
        Some(self.vertices[fan.last as usize])
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertices(&self) -> &[FanVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Iterates over the index triples of all emitted triangles.
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Vertex positions as a flat array, two floats per vertex.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn clear(&mut self) {
        self.fan = None;
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Builds a non-indexed list of independent curve-correction triangles.
#[derive(Clone, Debug, Default)]
pub struct TriangleListBuilder {
    vertices: Vec<CurveVertex>,
}

impl TriangleListBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, v0: CurveVertex, v1: CurveVertex, v2: CurveVertex) {
        self.vertices.extend_from_slice(&[v0, v1, v2]);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[CurveVertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> impl Iterator<Item = [CurveVertex; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Vertices as a flat array, four floats (`x, y, s, t`) per vertex.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_restart_then_n_triangles() {
        let mut fan = TriangleFanBuilder::new();
        fan.restart(FanVertex::new(0., 0.), FanVertex::new(1., 0.))
            .unwrap();
        for i in 0..5 {
            fan.next_triangle(FanVertex::new(i as f32, 1.)).unwrap();
        }
        assert_eq!(fan.triangle_count(), 5);
        assert_eq!(fan.vertex_count(), 7);
        let tris: Vec<_> = fan.triangles().collect();
        assert_eq!(tris[0], [0, 1, 2]);
        assert_eq!(tris[1], [0, 2, 3]);
        assert_eq!(tris[4], [0, 5, 6]);
    }

    #[test]
    fn fan_reanchors_on_restart() {
        let mut fan = TriangleFanBuilder::new();
        fan.restart(FanVertex::new(0., 0.), FanVertex::new(0., 0.))
            .unwrap();
        fan.next_triangle(FanVertex::new(1., 0.)).unwrap();
        fan.restart(FanVertex::new(5., 5.), FanVertex::new(5., 5.))
            .unwrap();
        fan.next_triangle(FanVertex::new(6., 5.)).unwrap();
        let tris: Vec<_> = fan.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [3, 4, 5]]);
    }

    #[test]
    fn next_triangle_requires_restart() {
        let mut fan = TriangleFanBuilder::new();
        let err = fan.next_triangle(FanVertex::new(1., 1.)).unwrap_err();
        assert!(matches!(err, TessellationError::FanNotStarted));
        assert_eq!(fan.vertex_count(), 0);

        fan.restart(FanVertex::default(), FanVertex::default())
            .unwrap();
        fan.clear();
        assert!(matches!(
            fan.next_triangle(FanVertex::default()),
            Err(TessellationError::FanNotStarted)
        ));
    }

    #[test]
    fn fan_index_overflow_is_reported() {
        let mut fan = TriangleFanBuilder::new();
        fan.restart(FanVertex::default(), FanVertex::default())
            .unwrap();
        // Indices 0..=65535 are addressable.
        for _ in 2..=u16::MAX as usize {
            fan.next_triangle(FanVertex::default()).unwrap();
        }
        assert_eq!(fan.vertex_count(), 65536);
        let err = fan.next_triangle(FanVertex::default()).unwrap_err();
        assert!(matches!(
            err,
            TessellationError::IndexOverflow {
                vertex_count: 65537
            }
        ));
        assert_eq!(fan.vertex_count(), 65536);
        assert!(fan.indices().iter().all(|&ix| (ix as usize) < 65536));
    }

    #[test]
    fn flat_arrays_have_expected_stride() {
        let mut fan = TriangleFanBuilder::new();
        fan.restart(FanVertex::new(1., 2.), FanVertex::new(3., 4.))
            .unwrap();
        fan.next_triangle(FanVertex::new(5., 6.)).unwrap();
        assert_eq!(fan.vertex_floats(), &[1., 2., 3., 4., 5., 6.]);
        assert_eq!(fan.vertex_bytes().len(), 3 * 8);
        assert_eq!(fan.index_bytes().len(), 3 * 2);

        let mut curves = TriangleListBuilder::new();
        curves.add_triangle(
            CurveVertex::new(FanVertex::new(0., 0.), CurveVertex::ST_START),
            CurveVertex::new(FanVertex::new(1., 0.), CurveVertex::ST_CONTROL),
            CurveVertex::new(FanVertex::new(1., 1.), CurveVertex::ST_END),
        );
        assert_eq!(curves.vertex_count(), 3);
        assert_eq!(curves.vertex_bytes().len(), 3 * 16);
        assert_eq!(
            curves.vertex_floats(),
            &[0., 0., 0., 0., 1., 0., 0.5, 0., 1., 1., 1., 1.]
        );
    }
}
