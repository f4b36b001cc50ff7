//! Static scene dressing: lights, the dark frame around the pond and the
//! lily pads.

use bevy::{
    asset::RenderAssetUsages,
    gltf::Gltf,
    pbr::light_consts,
    prelude::*,
    render::mesh::{Indices, PrimitiveTopology},
};
use koi_shared::{
    BOUNDARY_HEIGHT, BOUNDARY_INNER_SIZE, BOUNDARY_OUTER_SIZE, LILY_PADS_POSITION,
    LILY_PADS_SCALE,
};

use crate::{assets::PendingScenery, bootstrap::PondEntity, constants::LILY_PADS_MODEL_PATH};

pub fn spawn_lights(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 500.0,
        ..default()
    });

    commands.spawn((
        PondEntity,
        DirectionalLight {
            illuminance: light_consts::lux::AMBIENT_DAYLIGHT * 0.8,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 7.5).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Flat square frame in the XZ plane with a square hole in the middle.
///
/// Outer corners are vertices 0..4, inner corners 4..8, both counter-clockwise
/// seen from above. Each side of the frame is one quad.
pub fn boundary_frame_mesh(outer_size: f32, inner_size: f32) -> Mesh {
    let o = outer_size / 2.0;
    let i = inner_size / 2.0;

    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let positions: Vec<[f32; 3]> = corners
        .iter()
        .map(|(x, z)| [x * o, 0.0, z * o])
        .chain(corners.iter().map(|(x, z)| [x * i, 0.0, z * i]))
        .collect();
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];

    let mut indices = Vec::with_capacity(24);
    for side in 0..4u32 {
        let next = (side + 1) % 4;
        indices.extend_from_slice(&[side, next, 4 + next, side, 4 + next, 4 + side]);
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_indices(Indices::U32(indices))
}

/// Black frame above the water that hides everything outside the pond.
pub fn spawn_boundary_frame(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mesh = meshes.add(boundary_frame_mesh(BOUNDARY_OUTER_SIZE, BOUNDARY_INNER_SIZE));
    let material = materials.add(StandardMaterial {
        base_color: Color::BLACK,
        unlit: true,
        cull_mode: None,
        double_sided: true,
        ..default()
    });

    commands.spawn((
        PondEntity,
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_xyz(0.0, BOUNDARY_HEIGHT, 0.0),
    ));
}

pub fn spawn_lily_pads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingScenery>,
) {
    pending.track(
        LILY_PADS_MODEL_PATH,
        asset_server.load::<Gltf>(LILY_PADS_MODEL_PATH),
    );

    commands.spawn((
        PondEntity,
        SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(LILY_PADS_MODEL_PATH))),
        Transform::from_translation(LILY_PADS_POSITION).with_scale(Vec3::splat(LILY_PADS_SCALE)),
    ));
}
