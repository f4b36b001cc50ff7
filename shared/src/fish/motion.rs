use bevy::math::{ops::atan2, Quat, Vec3};
use log::debug;
use rand::Rng;

use crate::config::{FishConfig, SpeedScaling};

/// A turn in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Turn {
    /// Time (seconds) the turn started
    pub started_at: f32,
    /// Length of the turn in seconds
    pub duration: f32,
    /// Heading adopted once the turn completes
    pub target: Vec3,
}

impl Turn {
    /// Normalized progress. A non-positive duration counts as complete.
    #[inline]
    pub fn progress(&self, now: f32) -> f32 {
        if self.duration > 0.0 {
            (now - self.started_at) / self.duration
        } else {
            1.0
        }
    }
}

/// Swimming state of a single fish.
///
/// `heading` is kept unit length with a zero Y component at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct FishState {
    pub position: Vec3,
    pub heading: Vec3,
    pub speed: f32,
    /// Current rotation about +Y
    pub yaw: f32,
    /// Rotation the fish is easing toward
    pub target_yaw: f32,
    pub turn: Option<Turn>,
    /// Earliest time (seconds) at which the next turn may start
    pub next_turn_at: f32,
}

/// Yaw that points the model's +X axis along `heading`.
#[inline]
pub fn heading_yaw(heading: Vec3) -> f32 {
    atan2(-heading.z, heading.x)
}

/// Uniformly random direction in the XZ plane.
pub fn random_heading(rng: &mut impl Rng) -> Vec3 {
    loop {
        let candidate = Vec3::new(rng.gen::<f32>() - 0.5, 0.0, rng.gen::<f32>() - 0.5);
        if let Some(heading) = candidate.try_normalize() {
            return heading;
        }
    }
}

/// Picks a random new heading, falling back to the edge of the cone when the
/// sample deviates from `heading` by more than `cone` radians.
pub fn pick_turn_target(heading: Vec3, cone: f32, rng: &mut impl Rng) -> Vec3 {
    let candidate = random_heading(rng);
    if heading.angle_between(candidate) <= cone {
        return candidate;
    }

    // Rotating about Y keeps the fish level
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    (Quat::from_rotation_y(cone * sign) * heading).normalize()
}

impl FishState {
    pub fn new(position: Vec3, heading: Vec3, speed: f32, next_turn_at: f32) -> Self {
        let heading = Vec3::new(heading.x, 0.0, heading.z)
            .try_normalize()
            .unwrap_or(Vec3::X);
        let yaw = heading_yaw(heading);

        Self {
            position,
            heading,
            speed,
            yaw,
            target_yaw: yaw,
            turn: None,
            next_turn_at,
        }
    }

    /// Random fish somewhere in the spawn square, at the configured depth.
    pub fn spawn(config: &FishConfig, now: f32, rng: &mut impl Rng) -> Self {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * config.spawn_extent,
            config.depth,
            (rng.gen::<f32>() - 0.5) * config.spawn_extent,
        );
        let heading = random_heading(rng);
        let speed = config.speed.sample(rng);
        let next_turn_at = now + config.first_turn_delay.sample(rng);

        Self::new(position, heading, speed, next_turn_at)
    }

    #[inline]
    pub fn is_turning(&self) -> bool {
        self.turn.is_some()
    }

    /// Rotation with pitch and roll pinned to zero.
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Advances the fish by one frame.
    ///
    /// # Arguments
    /// * `now` - Elapsed time in seconds
    /// * `delta` - Frame time in seconds, only used by `SpeedScaling::PerSecond`
    pub fn step(&mut self, now: f32, delta: f32, config: &FishConfig, rng: &mut impl Rng) {
        self.translate(delta, config.speed_scaling);
        self.reflect_at_bounds(config);

        if self.turn.is_none() && now > self.next_turn_at {
            self.begin_turn(now, config, rng);
        }
        self.advance_turn(now, config, rng);

        self.yaw += (self.target_yaw - self.yaw) * config.yaw_smoothing;
    }

    fn translate(&mut self, delta: f32, scaling: SpeedScaling) {
        let distance = match scaling {
            SpeedScaling::PerFrame => self.speed,
            SpeedScaling::PerSecond { reference_fps } => self.speed * delta * reference_fps,
        };
        self.position += self.heading * distance;
    }

    /// Returns true if the heading was mirrored.
    fn reflect_at_bounds(&mut self, config: &FishConfig) -> bool {
        let bounds = config.swim_bounds;
        let outside_x = self.position.x.abs() > bounds.x;
        let outside_z = self.position.z.abs() > bounds.y;

        if !outside_x && !outside_z {
            return false;
        }

        if outside_x {
            self.heading.x = -self.heading.x;
        }
        if outside_z {
            self.heading.z = -self.heading.z;
        }
        self.heading = self.heading.normalize();
        self.target_yaw = heading_yaw(self.heading);
        true
    }

    fn begin_turn(&mut self, now: f32, config: &FishConfig, rng: &mut impl Rng) {
        let duration = config.turn_duration.sample(rng);
        let target = pick_turn_target(self.heading, config.turn_cone(), rng);

        debug!(
            "Fish at {:?} turning toward {:?} over {:.2}s",
            self.position, target, duration
        );

        self.turn = Some(Turn {
            started_at: now,
            duration,
            target,
        });
    }

    fn advance_turn(&mut self, now: f32, config: &FishConfig, rng: &mut impl Rng) {
        let Some(turn) = self.turn else {
            return;
        };

        if turn.progress(now) >= 1.0 {
            self.heading = turn.target;
            self.turn = None;
            self.next_turn_at = now + config.turn_interval.sample(rng);
            return;
        }

        self.heading = self
            .heading
            .lerp(turn.target, config.turn_blend)
            .try_normalize()
            .unwrap_or(self.heading);
        self.target_yaw = heading_yaw(self.heading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const FRAME: f32 = 1.0 / 60.0;
    const EPSILON: f32 = 1e-4;

    fn calm_fish(position: Vec3, heading: Vec3) -> FishState {
        // Far-off deadline so no turn starts during the test
        FishState::new(position, heading, 0.02, 1.0e6)
    }

    #[test]
    fn test_heading_stays_unit_and_level() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut fishes: Vec<FishState> = (0..8)
            .map(|_| FishState::spawn(&config, 0.0, &mut rng))
            .collect();

        let mut now = 0.0;
        for _ in 0..20_000 {
            now += FRAME;
            for fish in fishes.iter_mut() {
                fish.step(now, FRAME, &config, &mut rng);

                assert!((fish.heading.length() - 1.0).abs() < EPSILON);
                assert_eq!(fish.heading.y, 0.0);
                assert_eq!(fish.position.y, config.depth);
            }
        }
    }

    #[test]
    fn test_bounces_off_positive_x_boundary() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut fish = calm_fish(Vec3::new(config.swim_bounds.x, config.depth, 0.0), Vec3::X);

        fish.step(0.0, FRAME, &config, &mut rng);

        assert!(fish.heading.x < 0.0);
        assert!((fish.target_yaw - heading_yaw(Vec3::NEG_X)).abs() < EPSILON);
    }

    #[test]
    fn test_bounce_only_flips_offending_axis() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let heading = Vec3::new(1.0, 0.0, 1.0).normalize();
        let mut fish = calm_fish(Vec3::new(0.0, config.depth, -config.swim_bounds.y - 0.5), heading);

        fish.step(0.0, FRAME, &config, &mut rng);

        assert!(fish.heading.x > 0.0);
        assert!(fish.heading.z < 0.0);
    }

    #[test]
    fn test_completed_turn_adopts_target() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut fish = calm_fish(Vec3::new(0.0, config.depth, 0.0), Vec3::X);
        fish.turn = Some(Turn {
            started_at: 10.0,
            duration: 2.0,
            target: Vec3::NEG_Z,
        });

        fish.step(12.5, FRAME, &config, &mut rng);

        assert!(!fish.is_turning());
        assert_eq!(fish.heading, Vec3::NEG_Z);
        assert!(config.turn_interval.contains(fish.next_turn_at - 12.5));
    }

    #[test]
    fn test_turn_in_progress_blends_heading() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut fish = calm_fish(Vec3::new(0.0, config.depth, 0.0), Vec3::X);
        fish.turn = Some(Turn {
            started_at: 0.0,
            duration: 3.0,
            target: Vec3::NEG_Z,
        });

        fish.step(1.0, FRAME, &config, &mut rng);

        assert!(fish.is_turning());
        assert!(fish.heading.x > 0.9 && fish.heading.z < 0.0);
        assert!((fish.target_yaw - heading_yaw(fish.heading)).abs() < EPSILON);
    }

    #[test]
    fn test_zero_duration_turn_completes_immediately() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut fish = calm_fish(Vec3::new(0.0, config.depth, 0.0), Vec3::X);
        fish.turn = Some(Turn {
            started_at: 5.0,
            duration: 0.0,
            target: Vec3::Z,
        });

        fish.step(5.0, FRAME, &config, &mut rng);

        assert!(!fish.is_turning());
        assert_eq!(fish.heading, Vec3::Z);
    }

    #[test]
    fn test_due_fish_starts_turn_within_cone() {
        let config = FishConfig::default();
        let cone = config.turn_cone();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut fish = FishState::new(Vec3::new(0.0, config.depth, 0.0), Vec3::X, 0.01, 0.0);

            fish.step(0.5, FRAME, &config, &mut rng);

            let turn = fish.turn.expect("turn should have started");
            assert!(Vec3::X.angle_between(turn.target) <= cone + EPSILON);
            assert_eq!(turn.target.y, 0.0);
            assert!(config.turn_duration.contains(turn.duration));
        }
    }

    #[test]
    fn test_turn_waits_for_deadline() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut fish = FishState::new(Vec3::new(0.0, config.depth, 0.0), Vec3::X, 0.01, 4.0);

        fish.step(4.0, FRAME, &config, &mut rng);
        assert!(!fish.is_turning());

        fish.step(4.1, FRAME, &config, &mut rng);
        assert!(fish.is_turning());
    }

    #[test]
    fn test_yaw_eases_ten_percent() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut fish = calm_fish(Vec3::new(0.0, config.depth, 0.0), Vec3::X);
        fish.yaw = 0.0;
        fish.target_yaw = 1.0;

        fish.step(0.0, FRAME, &config, &mut rng);

        assert!((fish.yaw - 0.1).abs() < EPSILON);
    }

    #[test]
    fn test_per_frame_step_ignores_delta() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut slow = calm_fish(Vec3::new(0.0, config.depth, 0.0), Vec3::X);
        let mut fast = slow.clone();

        slow.step(0.0, 1.0 / 30.0, &config, &mut rng);
        fast.step(0.0, 1.0 / 144.0, &config, &mut rng);

        assert!((slow.position.x - 0.02).abs() < EPSILON);
        assert_eq!(slow.position, fast.position);
    }

    #[test]
    fn test_per_second_step_scales_with_delta() {
        let config = FishConfig {
            speed_scaling: SpeedScaling::PerSecond {
                reference_fps: 60.0,
            },
            ..FishConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut fish = calm_fish(Vec3::new(0.0, config.depth, 0.0), Vec3::X);

        fish.step(0.0, 1.0 / 30.0, &config, &mut rng);

        assert!((fish.position.x - 0.04).abs() < EPSILON);
    }

    #[test]
    fn test_spawn_respects_config() {
        let config = FishConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let half = config.spawn_extent / 2.0;

        for _ in 0..500 {
            let fish = FishState::spawn(&config, 100.0, &mut rng);
            assert!(fish.position.x.abs() <= half && fish.position.z.abs() <= half);
            assert_eq!(fish.position.y, config.depth);
            assert!(config.speed.contains(fish.speed));
            assert!(config.first_turn_delay.contains(fish.next_turn_at - 100.0));
            assert!((fish.heading.length() - 1.0).abs() < EPSILON);
            assert!(!fish.is_turning());
        }
    }

    #[test]
    fn test_rotation_is_pure_yaw() {
        let mut fish = calm_fish(Vec3::ZERO, Vec3::NEG_Z);
        fish.yaw = heading_yaw(fish.heading);

        let forward = fish.rotation() * Vec3::X;
        assert!((forward - Vec3::NEG_Z).length() < EPSILON);
    }
}
