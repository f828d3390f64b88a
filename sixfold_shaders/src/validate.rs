// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use thiserror::Error;

use crate::ShaderSource;

/// A shader which naga could not accept.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Failed to parse shader {name}:\n{message}")]
    Parse { name: &'static str, message: String },
    #[error("Shader {name} failed validation:\n{message}")]
    Validation { name: &'static str, message: String },
    #[error("Shader {name} has no entry point named {entry_point}")]
    MissingEntryPoint {
        name: &'static str,
        entry_point: &'static str,
    },
}

impl ShaderError {
    /// Name of the shader module the error refers to.
    pub fn shader_name(&self) -> &'static str {
        match self {
            Self::Parse { name, .. }
            | Self::Validation { name, .. }
            | Self::MissingEntryPoint { name, .. } => name,
        }
    }
}

/// Parses and validates `shader`, and checks that every listed entry point exists.
pub fn validate(shader: &ShaderSource) -> Result<(), ShaderError> {
    let module = wgsl::parse_str(shader.wgsl).map_err(|err| ShaderError::Parse {
        name: shader.name,
        message: err.emit_to_string(shader.wgsl),
    })?;
    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| ShaderError::Validation {
            name: shader.name,
            message: err.emit_to_string(shader.wgsl),
        })?;
    for &entry_point in shader.entry_points {
        if !module.entry_points.iter().any(|ep| ep.name == entry_point) {
            return Err(ShaderError::MissingEntryPoint {
                name: shader.name,
                entry_point,
            });
        }
    }
    Ok(())
}
