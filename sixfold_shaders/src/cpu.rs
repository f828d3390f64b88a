// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU implementations of the two render passes.
//!
//! These follow the WGSL closely and are meant for testing and debugging. They
//! reproduce what the GPU computes up to rasterization of pixel centres lying
//! exactly on a triangle edge, which is resolved with the top-left rule here
//! and by the driver's fixed-point snapping on the GPU.

// Allow un-idiomatic Rust to more closely match shaders
#![expect(
    clippy::needless_range_loop,
    reason = "Keeps code easily comparable to GPU shaders"
)]

mod accumulate;
mod finalize;

pub use accumulate::{accumulate, CpuTarget};
pub use finalize::{coverage_columns, decode_pixel, finalize, subpixel_rgb};

/// Converts a pixel packed as `u32` (red in the low byte) into unit floats.
pub fn unpack4x8unorm(x: u32) -> [f32; 4] {
    let mut result = [0.0; 4];
    for i in 0..4 {
        result[i] = ((x >> (i * 8)) & 0xff) as f32 * (1.0 / 255.0);
    }
    result
}

pub fn pack4x8unorm(x: [f32; 4]) -> u32 {
    let mut result = 0;
    for i in 0..4 {
        let byte = (x[i].clamp(0.0, 1.0) * 255.0).round() as u32;
        result |= byte << (i * 8);
    }
    result
}
