// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// No debug/print artifacts (logging goes through `log`)
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// GPU / graphics allowances — casts are intentional and safe
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Float comparison: graphics math frequently compares against 0.0, 1.0, etc.
#![allow(clippy::float_cmp)]
#![allow(clippy::module_name_repetitions)]

//! GPU-accelerated parametric surface viewer built on wgpu.
//!
//! Parasurf tessellates a (u,v) grid, maps it through user-supplied scalar
//! equations x(u,v,t), y(u,v,t), z(u,v,t) in the vertex shader, and lets you
//! fly a free camera through the result while live-editing the equations,
//! grid resolution, and camera parameters from on-screen panels.
//!
//! # Key entry points
//!
//! - [`Viewer`] - windowed application shell (winit + egui)
//! - [`scene::Scene`] - the object/component scene model and frame pipeline
//! - [`surface::SurfaceEditor`] - live equation/grid editing with debounced
//!   shader recompilation
//! - [`options::Options`] - TOML presets for camera and surface parameters
//!
//! # Architecture
//!
//! A scene is a map of [`scene::Object`]s, each a fixed slot table holding at
//! most one component per kind (mesh, camera, renderer, surface editor).
//! Each frame drains the input queue into the movement controller, updates
//! every object, then draws every renderer-bearing object with the main
//! camera. Equation edits recompile the surface shader (validated on the CPU
//! with naga, so bad equations produce a diagnostic instead of a crash) and
//! swap the render pipeline only on success; grid edits regenerate the mesh
//! and lazily re-upload it on the next draw.

pub mod axes;
pub mod camera;
pub mod error;
pub mod gpu;
pub mod input;
pub mod mesh;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod surface;
pub mod ui;
pub mod util;
pub mod viewer;

pub use error::ParasurfError;
pub use options::Options;
pub use viewer::Viewer;
