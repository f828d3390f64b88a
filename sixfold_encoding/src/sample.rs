// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The six sub-pixel coverage samples and their packed colour slots.

use peniko::kurbo::{Affine, Vec2};

use crate::SampleUniform;

/// Number of coverage samples taken per pixel.
pub const SAMPLE_COUNT: usize = 6;

/// Vertical offset of each sample, in twelfths of a pixel (positive is up).
pub const SAMPLE_Y_OFFSETS: [i32; SAMPLE_COUNT] = [-5, 1, -1, 5, -3, 3];

/// The bits of the accumulation target written by a single sample.
///
/// Sample `i` adds `weight` to byte channel `channel` of every pixel it covers.
/// The weights 1 and 16 put the two samples sharing a channel into separate
/// nibbles, so their parities can be decoded independently.
///
/// This holds for at most [`MAX_OVERLAP`](Self::MAX_OVERLAP) draws covering the
/// same sample at one pixel. The 16th draw of a weight 1 sample carries into the
/// bit of its weight 16 partner, and the 16th draw of a weight 16 sample saturates
/// the channel at 255.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelSlot {
    /// Index of the colour channel (0 = red, 1 = green, 2 = blue).
    pub channel: u8,
    /// Amount added to the channel per covered draw, either 1 or 16.
    pub weight: u8,
}

impl ChannelSlot {
    /// Number of triangles that may cover one sample of a pixel before its nibble overflows.
    pub const MAX_OVERLAP: u32 = 15;

    /// Slot of sample `index`: channel `index / 2`, weight 1 for even and 16 for odd samples.
    pub const fn for_sample(index: usize) -> Self {
        Self {
            channel: (index >> 1) as u8,
            weight: if index & 1 == 0 { 1 } else { 16 },
        }
    }

    /// The slot as a bit mask over an RGBA8 pixel packed as `u32` (red in the low byte).
    pub const fn mask(self) -> u32 {
        (self.weight as u32) << (8 * self.channel as u32)
    }

    /// The fragment colour which adds `weight` to `channel` under additive blending.
    pub fn color(self) -> [f32; 4] {
        let mut color = [0.0; 4];
        color[self.channel as usize] = f32::from(self.weight) / 255.0;
        color
    }
}

/// One of the six sample projections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleDescriptor {
    /// Offset added to the translation of the base projection, in normalized device coordinates.
    pub offset: Vec2,
    pub slot: ChannelSlot,
    /// Pixel space to normalized device coordinates, shifted by `offset`.
    pub transform: Affine,
}

/// Sample projections and colour slots for one viewport size.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleScheme {
    width: u32,
    height: u32,
    base: Affine,
    samples: [SampleDescriptor; SAMPLE_COUNT],
}

impl SampleScheme {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
        // Orthographic: pixel (0, 0) at the top-left corner, y down.
        let base = Affine::new([2.0 / w, 0.0, 0.0, -2.0 / h, -1.0, 1.0]);
        let samples = std::array::from_fn(|i| {
            let offset = Vec2::new(
                (2.0 * i as f64 - 1.0) / (12.0 * w),
                -f64::from(SAMPLE_Y_OFFSETS[i]) / (12.0 * h),
            );
            SampleDescriptor {
                offset,
                slot: ChannelSlot::for_sample(i),
                transform: base.then_translate(offset),
            }
        });
        Self {
            width,
            height,
            base,
            samples,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The projection without any sample offset.
    pub fn base_transform(&self) -> Affine {
        self.base
    }

    pub fn samples(&self) -> &[SampleDescriptor; SAMPLE_COUNT] {
        &self.samples
    }

    /// Shader uniforms for each sample, in draw order.
    pub fn uniforms(&self) -> [SampleUniform; SAMPLE_COUNT] {
        self.samples
            .map(|sample| SampleUniform::new(sample.transform, sample.slot.color()))
    }
}
