//! The koi school: spawned from one glTF model once it has loaded, then
//! moved every frame by the shared motion model.

use bevy::{gltf::Gltf, prelude::*, scene::SceneInstanceReady};
use koi_shared::{fish::FishState, sets::PondUpdateSet, PondConfig};
use rand::rngs::StdRng;

use crate::{
    assets::{load_phase, LoadPhase},
    bootstrap::{BootState, PondEntity},
    constants::FISH_MODEL_PATH,
};

/// Swimming state of one koi.
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct Fish(pub FishState);

/// Source of randomness for spawning and turning. Seedable from the CLI.
#[derive(Resource, Deref, DerefMut)]
pub struct FishRng(pub StdRng);

#[derive(Debug, Clone, PartialEq)]
pub enum SchoolPhase {
    Loading { model: Handle<Gltf> },
    Spawned { count: usize },
    Unavailable,
}

#[derive(Resource, Debug)]
pub struct FishSchool {
    pub phase: SchoolPhase,
}

/// The model's first animation clip, played on loop by every fish.
#[derive(Resource)]
pub struct SwimAnimation {
    pub graph: Handle<AnimationGraph>,
    pub index: AnimationNodeIndex,
}

pub struct FishPlugin;

impl Plugin for FishPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(BootState::Ready), begin_fish_loading)
            .add_systems(
                Update,
                (spawn_school.run_if(resource_exists::<FishSchool>), animate_fish)
                    .chain()
                    .in_set(PondUpdateSet::Fish),
            );
    }
}

pub fn begin_fish_loading(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(FishSchool {
        phase: SchoolPhase::Loading {
            model: asset_server.load(FISH_MODEL_PATH),
        },
    });
}

/// Clones the fish model `config.fish.count` times once it is loaded.
pub fn spawn_school(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    config: Res<PondConfig>,
    time: Res<Time>,
    mut rng: ResMut<FishRng>,
    mut school: ResMut<FishSchool>,
) {
    let SchoolPhase::Loading { model } = &school.phase else {
        return;
    };
    let model = model.clone();

    match load_phase(&asset_server, model.id()) {
        LoadPhase::Pending => return,
        LoadPhase::Failed(reason) => {
            error!("Error loading {}: {}", FISH_MODEL_PATH, reason);
            school.phase = SchoolPhase::Unavailable;
            return;
        }
        LoadPhase::Ready => {}
    }

    let Some(gltf) = gltfs.get(&model) else {
        return;
    };
    let Some(scene) = gltf.scenes.first().cloned() else {
        error!("{} contains no scene", FISH_MODEL_PATH);
        school.phase = SchoolPhase::Unavailable;
        return;
    };

    if let Some(clip) = gltf.animations.first() {
        let (graph, index) = AnimationGraph::from_clip(clip.clone());
        commands.insert_resource(SwimAnimation {
            graph: graphs.add(graph),
            index,
        });
    } else {
        warn!("{} has no animation, fish will not swim in place", FISH_MODEL_PATH);
    }

    let now = time.elapsed_secs();
    let count = config.fish.count;
    for _ in 0..count {
        let state = FishState::spawn(&config.fish, now, &mut rng.0);
        let transform = Transform::from_translation(state.position)
            .with_rotation(state.rotation())
            .with_scale(Vec3::splat(config.fish.scale));

        commands
            .spawn((PondEntity, Fish(state), SceneRoot(scene.clone()), transform))
            .observe(play_swim_animation);
    }

    info!("Spawned {} koi", count);
    school.phase = SchoolPhase::Spawned { count };
}

/// Starts the swim cycle on every animation player inside a fish's scene.
fn play_swim_animation(
    trigger: Trigger<SceneInstanceReady>,
    mut commands: Commands,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
    animation: Option<Res<SwimAnimation>>,
) {
    let Some(animation) = animation else {
        return;
    };

    for entity in children.iter_descendants(trigger.target()) {
        if let Ok(mut player) = players.get_mut(entity) {
            player.play(animation.index).repeat();
            commands
                .entity(entity)
                .insert(AnimationGraphHandle(animation.graph.clone()));
        }
    }
}

/// Steps every fish and writes the result to its transform.
/// Pitch and roll are zero by construction of the rotation.
pub fn animate_fish(
    time: Res<Time>,
    config: Res<PondConfig>,
    mut rng: ResMut<FishRng>,
    mut fishes: Query<(&mut Fish, &mut Transform)>,
) {
    let now = time.elapsed_secs();
    let delta = time.delta_secs();

    for (mut fish, mut transform) in fishes.iter_mut() {
        fish.step(now, delta, &config.fish, &mut rng.0);
        transform.translation = fish.position;
        transform.rotation = fish.rotation();
    }
}
