//! Live-editable parametric surface: equation/grid parameters, the
//! debounced refresh state machine, and surface object construction.

mod tessellate;

use std::path::Path;

use serde::{Deserialize, Serialize};
pub use tessellate::{tessellate, GridParams};

use crate::gpu::pipeline::MeshPipeline;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader::{self, CompiledShader, ShaderError, XYZ_TOKEN};
use crate::mesh::Mesh;
use crate::renderer::Renderer;
use crate::scene::{Component, Object, UpdateCtx};

/// Seconds an equation edit waits before recompiling, so keystroke bursts
/// coalesce into one compile.
pub const RECOMPILE_DEBOUNCE: f32 = 0.5;

/// On-disk WGSL template carrying the [`XYZ_TOKEN`] placeholder.
pub const SURFACE_SHADER_PATH: &str = "assets/shaders/surface.wgsl";

/// The three scalar equations mapping (u, v, t) to world space.
///
/// The strings are trusted to be WGSL expressions; malformed text fails
/// shader compilation with a diagnostic, it does not crash the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Equations {
    /// x(u, v, t)
    pub x: String,
    /// y(u, v, t)
    pub y: String,
    /// z(u, v, t)
    pub z: String,
}

impl Default for Equations {
    fn default() -> Self {
        Self {
            x: "u".into(),
            y: "-5.0 * sin(t) * exp(-abs(u) - abs(v))".into(),
            z: "v".into(),
        }
    }
}

/// Everything the surface panel edits: equations plus grid parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    /// Equation strings.
    pub equations: Equations,
    /// Grid resolution and domain.
    pub grid: GridParams,
}

/// Component holding the live surface parameters and reacting to edits.
///
/// The UI mutates [`params`](Self::params) freely each frame; `update`
/// diffs against the last-applied snapshot. Equation changes arm the
/// recompile debounce (the sibling renderer's pipeline is swapped only
/// when the new shader validates); grid changes regenerate the sibling
/// mesh immediately.
pub struct SurfaceEditor {
    /// Live parameters, written by the UI layer.
    pub params: SurfaceParams,
    applied: SurfaceParams,
    recompile_timeout: f32,
}

impl SurfaceEditor {
    /// Create an editor whose applied snapshot matches `params`.
    #[must_use]
    pub fn new(params: SurfaceParams) -> Self {
        Self {
            applied: params.clone(),
            params,
            recompile_timeout: 0.0,
        }
    }

    pub(crate) fn update(&mut self, ctx: &UpdateCtx<'_>, obj: &mut Object) {
        self.observe_equation_edit();

        if self.poll_debounce(ctx.dt) {
            log::info!("refreshing equations");
            match compile_surface_pipeline(ctx.gpu, &self.params.equations) {
                Ok(pipeline) => {
                    obj.renderer_mut()
                        .expect("surface object missing Renderer component")
                        .set_pipeline(pipeline);
                }
                // Keep the previous pipeline; the viewer stays drawable.
                Err(e) => log::error!("equation rejected: {e}"),
            }
        }

        if self.params.grid != self.applied.grid {
            log::info!("refreshing grid");
            self.applied.grid = self.params.grid;
            let (vertices, indices) = tessellate(&self.params.grid);
            obj.mesh_mut()
                .expect("surface object missing Mesh component")
                .edit(vertices, indices);
        }
    }

    /// Arm (or re-arm) the recompile countdown when the equation text
    /// changed since the last observation.
    fn observe_equation_edit(&mut self) {
        if self.params.equations != self.applied.equations {
            self.recompile_timeout = RECOMPILE_DEBOUNCE;
            self.applied.equations = self.params.equations.clone();
        }
    }

    /// Tick the debounce countdown; true exactly once, when it expires.
    fn poll_debounce(&mut self, dt: f32) -> bool {
        if self.recompile_timeout <= 0.0 {
            return false;
        }
        self.recompile_timeout -= dt;
        if self.recompile_timeout <= 0.0 {
            self.recompile_timeout = 0.0;
            return true;
        }
        false
    }
}

/// Substitute the template's [`XYZ_TOKEN`] (first occurrence) with three
/// statements binding `x`, `y`, `z` to the equation expressions verbatim.
pub fn substitute_equations(source: &mut String, equations: &Equations) {
    if let Some(pos) = source.find(XYZ_TOKEN) {
        let statements = format!(
            "let x = {};\n    let y = {};\n    let z = {};",
            equations.x, equations.y, equations.z
        );
        source.replace_range(pos..pos + XYZ_TOKEN.len(), &statements);
    }
}

/// Load the surface shader template and compile it with the given
/// equations substituted in.
///
/// # Errors
///
/// Returns [`ShaderError`] if the template is missing or the substituted
/// source fails to parse or validate.
pub fn compile_surface_shader(
    equations: &Equations,
) -> Result<CompiledShader, ShaderError> {
    shader::load_with(Path::new(SURFACE_SHADER_PATH), |source| {
        substitute_equations(source, equations);
    })
}

/// Compile the surface shader and link it into a drawable pipeline.
///
/// # Errors
///
/// Returns [`ShaderError`] on any compilation failure.
pub fn compile_surface_pipeline(
    gpu: &RenderContext,
    equations: &Equations,
) -> Result<MeshPipeline, ShaderError> {
    let shader = compile_surface_shader(equations)?;
    Ok(MeshPipeline::new(gpu, &shader, "Surface Pipeline"))
}

/// Build the surface object: editor + tessellated mesh + renderer.
///
/// # Errors
///
/// Returns [`ShaderError`] if the initial shader compilation fails (the
/// startup equations are expected to be valid).
pub fn create_surface(
    gpu: &RenderContext,
    params: SurfaceParams,
) -> Result<Object, ShaderError> {
    let (vertices, indices) = tessellate(&params.grid);
    let pipeline = compile_surface_pipeline(gpu, &params.equations)?;

    let mut obj = Object::new();
    obj.add_component(Component::SurfaceEditor(SurfaceEditor::new(params)));
    obj.add_component(Component::Renderer(Renderer::new(pipeline)));
    obj.add_component(Component::Mesh(Mesh::new(vertices, indices)));
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_is_verbatim_and_single() {
        let mut source = format!("a\n    {XYZ_TOKEN}\nb\n{XYZ_TOKEN}");
        let equations = Equations {
            x: "u * 2.0".into(),
            y: "sin(t)".into(),
            z: "v".into(),
        };
        substitute_equations(&mut source, &equations);

        assert!(source.contains("let x = u * 2.0;"));
        assert!(source.contains("let y = sin(t);"));
        assert!(source.contains("let z = v;"));
        // Only the first occurrence is replaced.
        assert!(source.contains(XYZ_TOKEN));
    }

    #[test]
    fn default_equations_compile() {
        let shader = compile_surface_shader(&Equations::default()).unwrap();
        assert!(!shader.source().contains(XYZ_TOKEN));
    }

    #[test]
    fn malformed_equation_fails_with_diagnostic() {
        let equations = Equations {
            y: "sin(".into(),
            ..Equations::default()
        };
        let err = compile_surface_shader(&equations).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Parse { .. } | ShaderError::Validation { .. }
        ));
    }

    #[test]
    fn debounce_fires_once_after_the_timeout() {
        let mut editor = SurfaceEditor::new(SurfaceParams::default());
        assert!(!editor.poll_debounce(1.0));

        editor.recompile_timeout = RECOMPILE_DEBOUNCE;
        assert!(!editor.poll_debounce(0.2));
        assert!(!editor.poll_debounce(0.2));
        assert!(editor.poll_debounce(0.2));
        // Expired timer stays quiet until re-armed.
        assert!(!editor.poll_debounce(1.0));
    }

    #[test]
    fn equation_edit_rearms_the_countdown() {
        let mut editor = SurfaceEditor::new(SurfaceParams::default());
        editor.observe_equation_edit();
        assert_eq!(editor.recompile_timeout, 0.0);

        editor.params.equations.y = "u + v".into();
        editor.observe_equation_edit();
        assert_eq!(editor.recompile_timeout, RECOMPILE_DEBOUNCE);

        // A second keystroke mid-countdown resets the full window.
        assert!(!editor.poll_debounce(0.3));
        editor.params.equations.y = "u + v + 1.0".into();
        editor.observe_equation_edit();
        assert_eq!(editor.recompile_timeout, RECOMPILE_DEBOUNCE);
    }
}
