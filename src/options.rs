//! Startup options with TOML preset support.
//!
//! All tweakable startup state (camera parameters, surface equations and
//! grid, key bindings) is consolidated here. Options serialize to/from
//! TOML; every section uses `#[serde(default)]` so partial preset files
//! (e.g. only overriding `[surface.equations]`) work correctly.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::CameraParams;
use crate::error::ParasurfError;
use crate::input::KeyBindings;
use crate::surface::SurfaceParams;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraParams,
    /// Surface equations, resolution, and domain.
    pub surface: SurfaceParams,
    /// Keyboard binding options.
    pub keys: KeyBindings,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ParasurfError`] on I/O or parse failure.
    pub fn load(path: &Path) -> Result<Self, ParasurfError> {
        let content =
            std::fs::read_to_string(path).map_err(ParasurfError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ParasurfError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ParasurfError`] on I/O or serialization failure.
    pub fn save(&self, path: &Path) -> Result<(), ParasurfError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ParasurfError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ParasurfError::Io)?;
        }
        std::fs::write(path, content).map_err(ParasurfError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_preset_keeps_defaults_elsewhere() {
        let parsed: Options = toml::from_str(
            "[surface.grid]\nres_x = 16\nres_y = 8\n",
        )
        .unwrap();
        assert_eq!(parsed.surface.grid.res_x, 16);
        assert_eq!(parsed.surface.grid.res_y, 8);
        assert_eq!(parsed.camera, CameraParams::default());
        assert_eq!(
            parsed.surface.equations,
            crate::surface::Equations::default()
        );
    }
}
