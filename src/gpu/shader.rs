//! WGSL shader loading, textual transformation, and CPU-side validation.
//!
//! Shaders are parsed and validated with naga before any wgpu module is
//! created, so a malformed shader (including one produced by bad equation
//! text) surfaces as a [`ShaderError`] with a readable diagnostic rather
//! than a device error. Loading accepts an optional transform applied to
//! the raw source first; that is the substitution hook used for equation
//! injection.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder token in the surface vertex shader, replaced with generated
/// statements binding `x`, `y`, `z` to the live equation expressions.
pub const XYZ_TOKEN: &str = "__INCLUDE_XYZ__";

/// Errors from loading or compiling a shader. Never fatal: callers retain
/// their previous pipeline and surface the diagnostic.
#[derive(Debug)]
pub enum ShaderError {
    /// The source file could not be read.
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// WGSL parsing failed.
    Parse {
        /// Path of the offending source.
        path: PathBuf,
        /// Rendered diagnostic with source context.
        log: String,
    },
    /// The module parsed but failed validation.
    Validation {
        /// Path of the offending source.
        path: PathBuf,
        /// Rendered diagnostic with source context.
        log: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "could not read shader `{}`: {source}", path.display())
            }
            Self::Parse { path, log } => {
                write!(f, "failed to parse `{}`:\n{log}", path.display())
            }
            Self::Validation { path, log } => {
                write!(f, "failed to validate `{}`:\n{log}", path.display())
            }
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A WGSL module that parsed and validated on the CPU.
#[derive(Debug)]
pub struct CompiledShader {
    module: naga::Module,
    source: String,
}

impl CompiledShader {
    /// The (post-transform) WGSL source this module was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Hand the pre-validated IR to wgpu as a shader module.
    pub fn create_module(
        &self,
        device: &wgpu::Device,
        label: &str,
    ) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(self.module.clone())),
        })
    }
}

/// Load and compile a shader from a path.
///
/// # Errors
///
/// Returns [`ShaderError`] on I/O, parse, or validation failure.
pub fn load(path: &Path) -> Result<CompiledShader, ShaderError> {
    load_with(path, |_| {})
}

/// Load a shader, apply a textual transform to the raw source, then
/// compile the result.
///
/// # Errors
///
/// Returns [`ShaderError`] on I/O, parse, or validation failure.
pub fn load_with(
    path: &Path,
    transform: impl FnOnce(&mut String),
) -> Result<CompiledShader, ShaderError> {
    let mut source =
        std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    transform(&mut source);
    compile(source, path)
}

/// Parse and validate WGSL source. `path` is only used for diagnostics.
///
/// # Errors
///
/// Returns [`ShaderError::Parse`] or [`ShaderError::Validation`] with a
/// rendered diagnostic log on failure.
pub fn compile(
    source: String,
    path: &Path,
) -> Result<CompiledShader, ShaderError> {
    let module =
        naga::front::wgsl::parse_str(&source).map_err(|e| {
            let log = e.emit_to_string(&source);
            log::debug!("rejected shader source:\n{source}");
            ShaderError::Parse {
                path: path.to_path_buf(),
                log,
            }
        })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    );
    if let Err(e) = validator.validate(&module) {
        let log = e.emit_to_string(&source);
        log::debug!("rejected shader source:\n{source}");
        return Err(ShaderError::Validation {
            path: path.to_path_buf(),
            log,
        });
    }

    Ok(CompiledShader { module, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "
        @vertex
        fn vs_main(@location(0) pos: vec3<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(pos, 1.0);
        }
    ";

    #[test]
    fn valid_source_compiles() {
        let shader =
            compile(MINIMAL.to_owned(), Path::new("minimal.wgsl")).unwrap();
        assert!(shader.source().contains("vs_main"));
    }

    #[test]
    fn parse_failure_carries_a_diagnostic() {
        let err = compile("fn ??? {".to_owned(), Path::new("bad.wgsl"))
            .unwrap_err();
        match err {
            ShaderError::Parse { log, .. } => assert!(!log.is_empty()),
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(Path::new("does/not/exist.wgsl")).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }

    #[test]
    fn validation_failure_carries_a_diagnostic() {
        // Parses, but the fragment entry returns the wrong type.
        let src = "
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return 1.0;
            }
        ";
        let err =
            compile(src.to_owned(), Path::new("bad.wgsl")).unwrap_err();
        match err {
            ShaderError::Validation { log, .. } => assert!(!log.is_empty()),
            ShaderError::Parse { log, .. } => assert!(!log.is_empty()),
            other => panic!("expected compile error, got {other}"),
        }
    }
}
