//! Tunable pond parameters.
//!
//! Defaults reproduce the classic koi pond scene. Every section is
//! `#[serde(default)]` so a RON file only needs the fields it changes.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{CAMERA_HEIGHT, DEFAULT_FISH_COUNT, FISH_DEPTH};

/// Closed-open interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct RandomRange {
    pub min: f32,
    pub max: f32,
}

impl RandomRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Degenerate ranges (`max <= min`) always yield `min`.
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..self.max)
        }
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// How a fish's speed maps to displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Reflect)]
pub enum SpeedScaling {
    /// `speed` world units every frame, regardless of frame time.
    #[default]
    PerFrame,
    /// `speed` world units per frame at `reference_fps`, scaled by frame time.
    PerSecond { reference_fps: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct FishConfig {
    /// Number of fish cloned from the model
    pub count: usize,
    /// Half extents (x, z) past which a fish bounces back
    pub swim_bounds: Vec2,
    /// Side of the square spawn area centered on the origin
    pub spawn_extent: f32,
    /// Fixed swim depth (Y)
    pub depth: f32,
    /// Uniform model scale
    pub scale: f32,
    pub speed: RandomRange,
    /// Maximum deviation of a new heading, in degrees.
    /// Values much above 40 make turns look jerky.
    pub turn_cone_degrees: f32,
    pub turn_duration: RandomRange,
    /// Delay between the end of a turn and the start of the next one
    pub turn_interval: RandomRange,
    /// Delay before a freshly spawned fish first turns
    pub first_turn_delay: RandomRange,
    /// Lerp factor applied to the heading every frame while turning
    pub turn_blend: f32,
    /// Fraction of the remaining yaw gap closed every frame
    pub yaw_smoothing: f32,
    pub speed_scaling: SpeedScaling,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_FISH_COUNT,
            swim_bounds: Vec2::new(6.0, 6.0),
            spawn_extent: 10.0,
            depth: FISH_DEPTH,
            scale: 0.5,
            speed: RandomRange::new(0.01, 0.03),
            turn_cone_degrees: 40.0,
            turn_duration: RandomRange::new(2.0, 4.0),
            turn_interval: RandomRange::new(3.0, 5.0),
            first_turn_delay: RandomRange::new(0.0, 5.0),
            turn_blend: 0.02,
            yaw_smoothing: 0.1,
            speed_scaling: SpeedScaling::PerFrame,
        }
    }
}

impl FishConfig {
    #[inline]
    pub fn turn_cone(&self) -> f32 {
        self.turn_cone_degrees.to_radians()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct WaterConfig {
    /// Surface tint, sRGB in 0..1
    pub base_color: Vec3,
    pub opacity: f32,
    /// Rings per world unit
    pub ripple_frequency: f32,
    /// Ring expansion speed in world units per second
    pub ripple_speed: f32,
    /// Exponential fade rate per second
    pub ripple_decay: f32,
    pub ripple_amplitude: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            // 0x87CEFA
            base_color: Vec3::new(135.0 / 255.0, 206.0 / 255.0, 250.0 / 255.0),
            opacity: 0.5,
            ripple_frequency: 12.0,
            ripple_speed: 1.5,
            ripple_decay: 0.9,
            ripple_amplitude: 0.04,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct PondConfig {
    pub fish: FishConfig,
    pub water: WaterConfig,
    /// Vertical extent of the orthographic view
    pub camera_height: f32,
}

impl Default for PondConfig {
    fn default() -> Self {
        Self {
            fish: FishConfig::default(),
            water: WaterConfig::default(),
            camera_height: CAMERA_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_range_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = RandomRange::new(3.0, 5.0);
        for _ in 0..1000 {
            let value = range.sample(&mut rng);
            assert!((3.0..5.0).contains(&value));
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(RandomRange::new(2.0, 2.0).sample(&mut rng), 2.0);
        assert_eq!(RandomRange::new(4.0, 1.0).sample(&mut rng), 4.0);
    }

    #[test]
    fn test_default_turn_cone_in_radians() {
        let config = FishConfig::default();
        assert!((config.turn_cone() - 40f32.to_radians()).abs() < 1e-6);
    }
}
