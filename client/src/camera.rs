use bevy::{prelude::*, render::camera::ScalingMode, window::WindowResized};
use koi_shared::{PondConfig, CAMERA_POSITION};

use crate::bootstrap::PondEntity;

#[derive(Component)]
pub struct PondCamera;

/// Orthographic extents for a fixed vertical size: `(width, height)`.
pub fn ortho_extent(camera_height: f32, window_width: f32, window_height: f32) -> Vec2 {
    let aspect = if window_height > 0.0 {
        window_width / window_height
    } else {
        1.0
    };
    Vec2::new(camera_height * aspect, camera_height)
}

fn scaling_mode(extent: Vec2) -> ScalingMode {
    ScalingMode::Fixed {
        width: extent.x,
        height: extent.y,
    }
}

/// Top-down orthographic camera looking at the pond center.
pub fn spawn_camera(
    mut commands: Commands,
    config: Res<PondConfig>,
    windows: Query<&Window>,
) {
    let extent = match windows.single() {
        Ok(window) => ortho_extent(config.camera_height, window.width(), window.height()),
        Err(_) => ortho_extent(config.camera_height, 1.0, 1.0),
    };

    commands.spawn((
        PondEntity,
        PondCamera,
        Camera3d::default(),
        Projection::from(OrthographicProjection {
            near: 0.1,
            far: 1000.0,
            scaling_mode: scaling_mode(extent),
            ..OrthographicProjection::default_3d()
        }),
        // Screen up is -Z when looking straight down
        Transform::from_translation(CAMERA_POSITION).looking_at(Vec3::ZERO, Vec3::NEG_Z),
    ));
}

/// Keeps the vertical extent fixed and widens or narrows the view with the
/// window's aspect ratio.
pub fn fit_camera_to_window(
    mut resized: EventReader<WindowResized>,
    config: Res<PondConfig>,
    mut projections: Query<&mut Projection, With<PondCamera>>,
) {
    let Some(event) = resized.read().last() else {
        return;
    };

    let extent = ortho_extent(config.camera_height, event.width, event.height);
    for mut projection in projections.iter_mut() {
        if let Projection::Orthographic(ortho) = projection.as_mut() {
            ortho.scaling_mode = scaling_mode(extent);
        }
    }
}
