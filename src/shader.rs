//! The smoke shader asset and its validation.
//!
//! The WGSL is validated with naga before wgpu ever sees it, so a broken
//! shader becomes a [`ShaderError`] instead of a device panic.

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::ShaderError;

/// Bumped whenever the shader's inputs or outputs change.
pub const SHADER_VERSION: u32 = 1;

/// Kernel (vertex stage) and rasterizer (fragment stage) source.
pub const SMOKE_SOURCE: &str = include_str!("smoke.wgsl");

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Validate the built-in smoke shader.
pub fn validate_smoke_shader() -> Result<naga::Module, ShaderError> {
    validate_wgsl(SMOKE_SOURCE, "Smoke")
}

/// Parse and validate WGSL source code.
pub fn validate_wgsl(source: &str, stage: &'static str) -> Result<naga::Module, ShaderError> {
    let module = wgsl::parse_str(source).map_err(|err| ShaderError {
        message: err.emit_to_string(source),
        stage,
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator.validate(&module).map_err(|err| ShaderError {
        message: format!("{}", err),
        stage,
    })?;

    Ok(module)
}
