// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph geometry and sample encoding for Sixfold.
//!
//! This crate contains everything about the renderer which does not need a GPU:
//! turning outline commands into the "rough" triangle fan and the quadratic
//! curve-correction triangles, the six sub-pixel sample descriptors with their
//! packed colour masks, and the uniform layouts shared with the shaders.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    reason = "Deferred, only apply in some feature sets so not expect"
)]

mod config;
mod layout;
mod mesh;
mod outline;
mod sample;
mod tessellate;

pub use config::{FinalizeMode, FinalizeUniform, RenderConfig, SampleUniform, UiToggles};
pub use layout::{LinePlacement, TextLayout};
pub use mesh::{CurveVertex, FanVertex, TriangleFanBuilder, TriangleListBuilder};
pub use outline::{OutlineError, OutlineSource};
pub use sample::{ChannelSlot, SampleDescriptor, SampleScheme, SAMPLE_COUNT, SAMPLE_Y_OFFSETS};
pub use tessellate::{GlyphMeshes, GlyphTessellator, TessellationError};

#[cfg(feature = "skrifa")]
pub use outline::SkrifaOutlines;

/// 2D geometry, with a focus on curves.
pub use peniko::kurbo;
