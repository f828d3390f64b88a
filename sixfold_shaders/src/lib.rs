// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The WGSL shaders of the [Sixfold] renderer.
//!
//! There are two shader modules, one per render pass:
//!
//! - [`ACCUMULATE`] draws the rough fan mesh (`vs_fan`/`fs_fan`) and the
//!   curve-correction mesh (`vs_curve`/`fs_curve`) with one sample's projection
//!   and packed colour per draw.
//! - [`FINALIZE`] draws a full-screen quad (`vs_main`/`fs_main`) decoding the
//!   packed coverage.
//!
//! With the `validate` feature, [`validate`] runs naga over a module so that
//! shader errors are reported before a GPU API sees the source. The `cpu`
//! feature provides software versions of both passes in [`cpu`].
//!
//! [Sixfold]: https://github.com/sixfold-rs/sixfold

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]
#![allow(
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    reason = "Deferred, only apply in some feature sets so not expect"
)]

#[cfg(feature = "cpu")]
pub mod cpu;
#[cfg(feature = "validate")]
mod validate;

#[cfg(feature = "validate")]
pub use validate::{validate, ShaderError};

/// A WGSL module and the entry points a pipeline may use from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    pub name: &'static str,
    pub wgsl: &'static str,
    pub entry_points: &'static [&'static str],
}

/// The accumulation pass.
pub const ACCUMULATE: ShaderSource = ShaderSource {
    name: "accumulate",
    wgsl: include_str!("../shader/accumulate.wgsl"),
    entry_points: &["vs_fan", "fs_fan", "vs_curve", "fs_curve"],
};

/// The finalize pass.
pub const FINALIZE: ShaderSource = ShaderSource {
    name: "finalize",
    wgsl: include_str!("../shader/finalize.wgsl"),
    entry_points: &["vs_main", "fs_main"],
};

pub const SHADERS: [ShaderSource; 2] = [ACCUMULATE, FINALIZE];
