use bevy::prelude::*;

/// Ripple slots available to the water shader (matches the WGSL array size).
pub const MAX_RIPPLES: usize = 10;

/// Vertical extent of the orthographic camera, in world units.
pub const CAMERA_HEIGHT: f32 = 7.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 5.0, 0.0);

/// Side length of the square water surface.
pub const POND_SIZE: f32 = 10.0;
pub const POND_SUBDIVISIONS: u32 = 200;
pub const WATER_LEVEL: f32 = 0.01;

pub const FISH_DEPTH: f32 = -1.25;
pub const DEFAULT_FISH_COUNT: usize = 5;

/// The boundary frame sits between the camera and the water.
pub const BOUNDARY_OUTER_SIZE: f32 = 50.0;
pub const BOUNDARY_INNER_SIZE: f32 = 10.0;
pub const BOUNDARY_HEIGHT: f32 = 3.0;

pub const LILY_PADS_POSITION: Vec3 = Vec3::new(-3.5, -0.025, 2.5);
pub const LILY_PADS_SCALE: f32 = 0.2;
