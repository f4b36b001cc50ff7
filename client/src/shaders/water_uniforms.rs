//! Water shader uniform data
//!
//! Separated into its own module to isolate the `#![allow(dead_code)]` directive,
//! which is required due to the ShaderType derive macro generating internal
//! `check` functions that trigger warnings.

#![allow(dead_code)]

use bevy::{prelude::*, render::render_resource::ShaderType};
use koi_shared::{WaterConfig, MAX_RIPPLES};

/// Uniform data for the water shader (matches WGSL `PondWater` struct)
#[derive(ShaderType, Debug, Clone, Copy)]
pub struct PondWaterUniform {
    /// Surface tint, linear RGB; alpha is ignored in favor of `opacity`
    pub base_color: Vec4,
    /// x = ring frequency, y = ring speed, z = decay, w = amplitude
    pub ripple_params: Vec4,
    /// Per ripple: xy = world (x, z) origin, z = start time
    pub ripples: [Vec4; MAX_RIPPLES],
    /// Elapsed seconds, refreshed every frame
    pub time: f32,
    pub opacity: f32,
    /// Number of leading entries of `ripples` in use
    pub active_ripples: u32,
}

impl PondWaterUniform {
    pub fn from_config(config: &WaterConfig) -> Self {
        let mut uniform = Self {
            base_color: Vec4::ZERO,
            ripple_params: Vec4::ZERO,
            ripples: [Vec4::ZERO; MAX_RIPPLES],
            time: 0.0,
            opacity: 0.0,
            active_ripples: 0,
        };
        uniform.apply_config(config);
        uniform
    }

    /// Copies the look parameters, leaving time and ripples untouched.
    pub fn apply_config(&mut self, config: &WaterConfig) {
        let color = Color::srgb(config.base_color.x, config.base_color.y, config.base_color.z)
            .to_linear();
        self.base_color = Vec4::new(color.red, color.green, color.blue, 1.0);
        self.ripple_params = Vec4::new(
            config.ripple_frequency,
            config.ripple_speed,
            config.ripple_decay,
            config.ripple_amplitude,
        );
        self.opacity = config.opacity.clamp(0.0, 1.0);
    }
}

impl Default for PondWaterUniform {
    fn default() -> Self {
        Self::from_config(&WaterConfig::default())
    }
}
