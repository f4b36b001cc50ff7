//! The pond's water surface.
//!
//! The surface exists in three phases. It starts `Loading` while the pond
//! base texture is fetched, becomes `Ready` once the texture arrives (the
//! material and plane are created at that moment), or `Unavailable` if the
//! texture failed. Time updates and ripples only apply when `Ready`.

use bevy::{
    picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility},
    prelude::*,
    window::PrimaryWindow,
};
use koi_shared::{
    sets::PondUpdateSet, water::RippleBuffer, PondConfig, POND_SIZE, POND_SUBDIVISIONS,
    WATER_LEVEL,
};

use crate::{
    assets::{load_phase, LoadPhase},
    bootstrap::{BootState, PondEntity},
    camera::PondCamera,
    constants::POND_BASE_TEXTURE_PATH,
    shaders::PondWaterMaterial,
};

#[derive(Debug, Clone, PartialEq)]
pub enum WaterPhase {
    Loading {
        texture: Handle<Image>,
    },
    Ready {
        material: Handle<PondWaterMaterial>,
        plane: Entity,
    },
    Unavailable,
}

#[derive(Resource, Debug)]
pub struct WaterSurface {
    pub phase: WaterPhase,
    /// Mirror of the shader's time uniform
    pub time: f32,
    pub ripples: RippleBuffer,
}

impl WaterSurface {
    pub fn loading(texture: Handle<Image>) -> Self {
        Self {
            phase: WaterPhase::Loading { texture },
            time: 0.0,
            ripples: RippleBuffer::new(),
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, WaterPhase::Ready { .. })
    }

    pub fn plane(&self) -> Option<Entity> {
        match self.phase {
            WaterPhase::Ready { plane, .. } => Some(plane),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<&Handle<PondWaterMaterial>> {
        match &self.phase {
            WaterPhase::Ready { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Returns false (and changes nothing) unless the surface is ready.
    pub fn advance_time(&mut self, seconds: f32) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.time = seconds;
        true
    }

    /// Records a ripple at the world-space hit, stamped with the current
    /// time value. Returns false (and changes nothing) unless ready.
    pub fn add_ripple(&mut self, hit: Vec3) -> bool {
        if !self.is_ready() {
            return false;
        }
        if let Some(evicted) = self.ripples.push(hit.xz(), self.time) {
            debug!("Ripple buffer full, dropped ripple from {:.2}s", evicted.started_at);
        }
        true
    }
}

pub struct WaterPlugin;

impl Plugin for WaterPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WaterClicked>()
            .add_systems(OnEnter(BootState::Ready), begin_water_loading)
            .add_systems(
                Update,
                (
                    (pick_water_on_click, inject_ripples)
                        .chain()
                        .in_set(PondUpdateSet::Input),
                    (finish_water_loading, advance_water_time)
                        .chain()
                        .in_set(PondUpdateSet::Water),
                )
                    .run_if(resource_exists::<WaterSurface>),
            );
    }
}

/// Marker for the water plane entity; the only target of ripple ray casts.
#[derive(Component)]
pub struct WaterPlane;

pub fn begin_water_loading(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(WaterSurface::loading(
        asset_server.load(POND_BASE_TEXTURE_PATH),
    ));
}

/// Builds the material and plane once the base texture has arrived.
pub fn finish_water_loading(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<PondConfig>,
    mut surface: ResMut<WaterSurface>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<PondWaterMaterial>>,
) {
    let WaterPhase::Loading { texture } = &surface.phase else {
        return;
    };
    let texture = texture.clone();

    match load_phase(&asset_server, texture.id()) {
        LoadPhase::Pending => {}
        LoadPhase::Failed(reason) => {
            error!("Error loading {}: {}", POND_BASE_TEXTURE_PATH, reason);
            surface.phase = WaterPhase::Unavailable;
        }
        LoadPhase::Ready => {
            let material = materials.add(PondWaterMaterial::new(&config.water, texture));
            let mesh = meshes.add(
                Plane3d::default()
                    .mesh()
                    .size(POND_SIZE, POND_SIZE)
                    .subdivisions(POND_SUBDIVISIONS),
            );

            let plane = commands
                .spawn((
                    PondEntity,
                    WaterPlane,
                    Mesh3d(mesh),
                    MeshMaterial3d(material.clone()),
                    Transform::from_xyz(0.0, WATER_LEVEL, 0.0),
                ))
                .id();

            info!("Water surface ready");
            surface.phase = WaterPhase::Ready { material, plane };
        }
    }
}

/// Sets the time uniform to the elapsed seconds. Also re-applies look
/// parameters when the config was edited.
pub fn advance_water_time(
    time: Res<Time>,
    config: Res<PondConfig>,
    mut surface: ResMut<WaterSurface>,
    mut materials: ResMut<Assets<PondWaterMaterial>>,
) {
    if !surface.advance_time(time.elapsed_secs()) {
        return;
    }

    let Some(material) = surface
        .material()
        .and_then(|handle| materials.get_mut(handle))
    else {
        return;
    };

    material.set_time(surface.time);
    if config.is_changed() {
        material.uniform.apply_config(&config.water);
    }
}

/// A left click that landed on the water plane.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WaterClicked {
    pub point: Vec3,
}

/// Casts a ray from the camera through the clicked pixel and reports where
/// it meets the water plane.
pub fn pick_water_on_click(
    mouse_input: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<PondCamera>>,
    mut ray_cast: MeshRayCast,
    surface: Res<WaterSurface>,
    mut clicks: EventWriter<WaterClicked>,
) {
    if !mouse_input.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(plane) = surface.plane() else {
        return;
    };

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    let only_water = |entity: Entity| entity == plane;
    let settings = MeshRayCastSettings::default()
        .with_filter(&only_water)
        .with_visibility(RayCastVisibility::Any);

    if let Some((_, hit)) = ray_cast.cast_ray(ray, &settings).first() {
        clicks.write(WaterClicked { point: hit.point });
    }
}

/// Records a ripple per click and uploads the buffer to the material.
pub fn inject_ripples(
    mut clicks: EventReader<WaterClicked>,
    mut surface: ResMut<WaterSurface>,
    mut materials: ResMut<Assets<PondWaterMaterial>>,
) {
    let mut added = false;
    for click in clicks.read() {
        if surface.add_ripple(click.point) {
            debug!("Ripple at ({:.2}, {:.2})", click.point.x, click.point.z);
            added = true;
        }
    }
    if !added {
        return;
    }

    if let Some(material) = surface
        .material()
        .and_then(|handle| materials.get_mut(handle))
    {
        material.set_ripples(&surface.ripples);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaders::PondWaterUniform;
    use koi_shared::{WaterConfig, MAX_RIPPLES};

    fn ready_surface() -> WaterSurface {
        let mut surface = WaterSurface::loading(Handle::default());
        surface.phase = WaterPhase::Ready {
            material: Handle::default(),
            plane: Entity::from_raw(7),
        };
        surface
    }

    #[test]
    fn test_loading_surface_ignores_time_and_ripples() {
        let mut surface = WaterSurface::loading(Handle::default());

        assert!(!surface.advance_time(3.0));
        assert!(!surface.add_ripple(Vec3::new(1.0, 0.0, 1.0)));
        assert_eq!(surface.time, 0.0);
        assert!(surface.ripples.is_empty());
        assert_eq!(surface.plane(), None);
    }

    #[test]
    fn test_unavailable_surface_stays_inert() {
        let mut surface = WaterSurface::loading(Handle::default());
        surface.phase = WaterPhase::Unavailable;

        assert!(!surface.advance_time(3.0));
        assert!(!surface.add_ripple(Vec3::ZERO));
        assert!(surface.material().is_none());
    }

    #[test]
    fn test_ripple_uses_hit_xz_and_current_time() {
        let mut surface = ready_surface();
        surface.advance_time(2.5);

        assert!(surface.add_ripple(Vec3::new(1.5, WATER_LEVEL, -0.75)));

        let slot = surface.ripples.iter().next().copied();
        assert_eq!(slot.map(|s| s.origin), Some(Vec2::new(1.5, -0.75)));
        assert_eq!(slot.map(|s| s.started_at), Some(2.5));
    }

    #[test]
    fn test_ripples_cap_at_buffer_size() {
        let mut surface = ready_surface();
        for i in 0..=MAX_RIPPLES {
            surface.advance_time(i as f32);
            surface.add_ripple(Vec3::new(i as f32, 0.0, 0.0));
        }

        assert_eq!(surface.ripples.len(), MAX_RIPPLES);
        assert_eq!(
            surface.ripples.iter().next().map(|s| s.started_at),
            Some(1.0)
        );
    }

    #[test]
    fn test_ready_surface_exposes_plane() {
        let surface = ready_surface();
        assert_eq!(surface.plane(), Some(Entity::from_raw(7)));
        assert!(surface.material().is_some());
    }

    fn ripple_app(ready: bool) -> (App, Handle<PondWaterMaterial>) {
        let mut materials = Assets::<PondWaterMaterial>::default();
        let material = materials.add(PondWaterMaterial::new(
            &WaterConfig::default(),
            Handle::default(),
        ));

        let mut surface = WaterSurface::loading(Handle::default());
        if ready {
            surface.phase = WaterPhase::Ready {
                material: material.clone(),
                plane: Entity::from_raw(7),
            };
            surface.advance_time(1.5);
        }

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<WaterClicked>()
            .insert_resource(materials)
            .insert_resource(surface)
            .add_systems(Update, inject_ripples);
        (app, material)
    }

    fn uploaded_uniform(app: &App, material: &Handle<PondWaterMaterial>) -> PondWaterUniform {
        let Some(material) = app.world().resource::<Assets<PondWaterMaterial>>().get(material)
        else {
            panic!("material should still exist");
        };
        material.uniform
    }

    #[test]
    fn test_clicks_upload_ripples_to_material() {
        let (mut app, material) = ripple_app(true);
        app.world_mut().send_event(WaterClicked {
            point: Vec3::new(2.0, WATER_LEVEL, -1.0),
        });
        app.world_mut().send_event(WaterClicked {
            point: Vec3::new(-3.0, WATER_LEVEL, 0.5),
        });

        app.update();

        let uniform = uploaded_uniform(&app, &material);
        assert_eq!(uniform.active_ripples, 2);
        assert_eq!(uniform.ripples[0], Vec4::new(2.0, -1.0, 1.5, 0.0));
        assert_eq!(uniform.ripples[1], Vec4::new(-3.0, 0.5, 1.5, 0.0));
        assert_eq!(app.world().resource::<WaterSurface>().ripples.len(), 2);
    }

    #[test]
    fn test_clicks_while_loading_leave_material_untouched() {
        let (mut app, material) = ripple_app(false);
        app.world_mut().send_event(WaterClicked {
            point: Vec3::new(1.0, WATER_LEVEL, 1.0),
        });

        app.update();

        assert_eq!(uploaded_uniform(&app, &material).active_ripples, 0);
        assert!(app.world().resource::<WaterSurface>().ripples.is_empty());
    }
}
