// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Creation of the wgpu shader modules.

use sixfold_shaders::ShaderSource;
use wgpu::{Device, ShaderModule};

use crate::{Error, Result};

/// Validates `source` with naga, then hands it to the device.
///
/// wgpu itself only reports shader errors through the device error callback.
pub(crate) fn create_shader_module(device: &Device, source: &ShaderSource) -> Result<ShaderModule> {
    sixfold_shaders::validate(source).map_err(|err| Error::ShaderCompilation {
        name: err.shader_name(),
        message: err.to_string(),
    })?;
    log::debug!("Creating shader module {}", source.name);
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(source.name),
        source: wgpu::ShaderSource::Wgsl(source.wgsl.into()),
    }))
}
