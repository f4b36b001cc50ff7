//! Ripple water material for the pond surface.
//!
//! Unlike a PBR extension this is a full custom material: the surface is
//! unlit, alpha blended, visible from both sides and never writes depth, so
//! the fish underneath stay visible through it.

use bevy::{
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    render::{
        mesh::MeshVertexBufferLayoutRef,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, SpecializedMeshPipelineError,
        },
    },
};
use koi_shared::{water::RippleBuffer, WaterConfig};

use super::{paths, PondWaterUniform};

/// Plugin that registers the pond water material.
pub struct PondWaterMaterialPlugin;

impl Plugin for PondWaterMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<PondWaterMaterial>::default());
    }
}

/// Water surface material.
///
/// Binding layout (material bind group):
/// - 0: `PondWaterUniform`
/// - 1, 2: pond base texture and its sampler
#[derive(Asset, AsBindGroup, TypePath, Debug, Clone)]
pub struct PondWaterMaterial {
    #[uniform(0)]
    pub uniform: PondWaterUniform,

    /// Image seen through the water
    #[texture(1)]
    #[sampler(2)]
    pub background: Handle<Image>,
}

impl PondWaterMaterial {
    pub fn new(config: &WaterConfig, background: Handle<Image>) -> Self {
        Self {
            uniform: PondWaterUniform::from_config(config),
            background,
        }
    }

    #[inline]
    pub fn set_time(&mut self, seconds: f32) {
        self.uniform.time = seconds;
    }

    /// Pushes the full ripple array and active count to the shader.
    pub fn set_ripples(&mut self, ripples: &RippleBuffer) {
        self.uniform.ripples = ripples.to_uniform();
        self.uniform.active_ripples = ripples.len() as u32;
    }
}

impl Material for PondWaterMaterial {
    fn vertex_shader() -> ShaderRef {
        paths::POND_VERTEX_SHADER.into()
    }

    fn fragment_shader() -> ShaderRef {
        paths::POND_FRAGMENT_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];

        // Visible from above and below
        descriptor.primitive.cull_mode = None;

        if let Some(depth_stencil) = descriptor.depth_stencil.as_mut() {
            depth_stencil.depth_write_enabled = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Vec2;
    use koi_shared::MAX_RIPPLES;

    #[test]
    fn test_ripples_upload_count_and_positions() {
        let mut material = PondWaterMaterial::new(&WaterConfig::default(), Handle::default());
        let mut ripples = RippleBuffer::new();
        ripples.push(Vec2::new(1.0, 2.0), 0.5);
        ripples.push(Vec2::new(-3.0, 4.0), 0.75);

        material.set_ripples(&ripples);

        assert_eq!(material.uniform.active_ripples, 2);
        assert_eq!(material.uniform.ripples[1], Vec4::new(-3.0, 4.0, 0.75, 0.0));
        assert_eq!(material.uniform.ripples[MAX_RIPPLES - 1], Vec4::ZERO);
    }

    #[test]
    fn test_config_sets_opacity_and_color() {
        let config = WaterConfig {
            opacity: 1.7,
            base_color: Vec3::ONE,
            ..WaterConfig::default()
        };
        let material = PondWaterMaterial::new(&config, Handle::default());

        assert_eq!(material.uniform.opacity, 1.0);
        assert!((material.uniform.base_color - Vec4::ONE).length() < 1e-5);
        assert_eq!(material.uniform.time, 0.0);
    }
}
