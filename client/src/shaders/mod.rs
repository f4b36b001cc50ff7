//! Custom shader integration for the pond water.
//!
//! ## Water Shader
//! The vertex stage (`data/shaders/pond_vertex.wgsl`) lifts the surface around
//! each active ripple. The fragment stage (`data/shaders/pond_fragment.wgsl`)
//! draws expanding rings, refracts the pond base texture through them and
//! tints the result with the configured base color.
//!
//! Both sources are fetched through the asset server before the scene is
//! built. See `crate::bootstrap`.

pub mod water;
pub mod water_uniforms;

use bevy::prelude::*;

pub use water::*;
pub use water_uniforms::*;

/// Shader asset paths
pub mod paths {
    /// Path to the water surface vertex stage
    pub const POND_VERTEX_SHADER: &str = "shaders/pond_vertex.wgsl";
    /// Path to the water surface fragment stage
    pub const POND_FRAGMENT_SHADER: &str = "shaders/pond_fragment.wgsl";
}

/// Handles to both shader stages, kept alive for the lifetime of the app.
#[derive(Resource, Debug, Clone)]
pub struct ShaderSources {
    pub vertex: Handle<Shader>,
    pub fragment: Handle<Shader>,
}

/// Starts fetching both shader stages.
pub fn request_shader_sources(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(ShaderSources {
        vertex: asset_server.load(paths::POND_VERTEX_SHADER),
        fragment: asset_server.load(paths::POND_FRAGMENT_SHADER),
    });
}
