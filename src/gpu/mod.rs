//! GPU resource lifecycle: context, geometry buffers, shader
//! compilation, and pipeline construction.
//!
//! Every GPU object lives in an owning wrapper whose `Drop` releases it
//! exactly once; transfer of ownership is a plain Rust move.

pub mod geometry;
pub mod pipeline;
pub mod render_context;
pub mod shader;

/// Depth attachment format shared by the context and every pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
