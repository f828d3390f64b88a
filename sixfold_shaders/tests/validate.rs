// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Every shader module must be accepted by naga.

use sixfold_shaders::{validate, ShaderError, ShaderSource, SHADERS};

#[test]
fn all_shaders_validate() {
    for shader in SHADERS {
        if let Err(err) = validate(&shader) {
            panic!("{err}");
        }
    }
}

#[test]
fn missing_entry_point_is_reported() {
    let shader = ShaderSource {
        entry_points: &["vs_main", "fs_missing"],
        ..sixfold_shaders::FINALIZE
    };
    let err = validate(&shader).unwrap_err();
    assert!(matches!(
        err,
        ShaderError::MissingEntryPoint {
            entry_point: "fs_missing",
            ..
        }
    ));
    assert_eq!(err.shader_name(), "finalize");
}

#[test]
fn parse_errors_are_reported() {
    let shader = ShaderSource {
        name: "broken",
        wgsl: "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0 }",
        entry_points: &[],
    };
    assert!(matches!(
        validate(&shader),
        Err(ShaderError::Parse { name: "broken", .. })
    ));
}

#[test]
fn type_errors_are_reported() {
    let shader = ShaderSource {
        name: "mistyped",
        wgsl: "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }",
        entry_points: &[],
    };
    let err = validate(&shader).unwrap_err();
    assert_eq!(err.shader_name(), "mistyped");
}
