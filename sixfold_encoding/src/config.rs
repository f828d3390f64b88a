// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};
use peniko::kurbo::Affine;

/// How the finalize pass turns packed coverage into a display colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FinalizeMode {
    /// The packed accumulation texel, unchanged.
    Raw = 0,
    /// A single sample, thresholded.
    #[default]
    NoAa = 1,
    /// Average of the six samples, the same value in every channel.
    Grayscale = 2,
    /// A three tap window per colour channel over horizontally adjacent samples.
    Subpixel = 3,
}

impl FinalizeMode {
    pub const ALL: [Self; 4] = [Self::Raw, Self::NoAa, Self::Grayscale, Self::Subpixel];

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_u32() == value)
    }
}

/// The boolean switches exposed by a user interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiToggles {
    pub show_fan: bool,
    pub show_curves: bool,
    pub show_raw_texture: bool,
    pub subpixel: bool,
    pub grayscale: bool,
}

impl Default for UiToggles {
    fn default() -> Self {
        Self {
            show_fan: true,
            show_curves: true,
            show_raw_texture: false,
            subpixel: false,
            grayscale: false,
        }
    }
}

/// Per-frame render settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub mode: FinalizeMode,
    /// Draw the rough fan mesh.
    pub show_fan: bool,
    /// Draw the curve-correction mesh. Without it, curved edges are faceted.
    pub show_curves: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::from_toggles(UiToggles::default())
    }
}

impl RenderConfig {
    pub fn new(mode: FinalizeMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Raw wins over everything, then subpixel, then grayscale.
    pub fn from_toggles(toggles: UiToggles) -> Self {
        let mode = if toggles.show_raw_texture {
            FinalizeMode::Raw
        } else if toggles.subpixel {
            FinalizeMode::Subpixel
        } else if toggles.grayscale {
            FinalizeMode::Grayscale
        } else {
            FinalizeMode::NoAa
        };
        Self {
            mode,
            show_fan: toggles.show_fan,
            show_curves: toggles.show_curves,
        }
    }
}

/// Per-sample uniform of the accumulation pass.
///
/// This must be kept in sync with the struct in `shader/accumulate.wgsl`
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
#[repr(C)]
pub struct SampleUniform {
    /// Linear part of the projection, as kurbo's `a, b, c, d` coefficients.
    pub matrix: [f32; 4],
    pub translate: [f32; 2],
    pub _padding: [f32; 2],
    /// Colour added to every covered pixel.
    pub color: [f32; 4],
}

impl SampleUniform {
    pub fn new(transform: Affine, color: [f32; 4]) -> Self {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        Self {
            matrix: [a as f32, b as f32, c as f32, d as f32],
            translate: [e as f32, f as f32],
            _padding: [0.0; 2],
            color,
        }
    }
}

/// Uniform of the finalize pass.
///
/// This must be kept in sync with the struct in `shader/finalize.wgsl`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
pub struct FinalizeUniform {
    pub mode: u32,
    /// Size of the accumulation target, used to clamp the second texel tap.
    pub width: u32,
    pub height: u32,
    pub _padding: u32,
}

impl FinalizeUniform {
    pub fn new(mode: FinalizeMode, width: u32, height: u32) -> Self {
        Self {
            mode: mode.as_u32(),
            width,
            height,
            _padding: 0,
        }
    }
}
