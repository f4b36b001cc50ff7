//! Scene bootstrap.
//!
//! Nothing is spawned until both shader stages have been fetched. A failed
//! fetch moves the app to `BootState::Aborted` and leaves the scene empty.

use bevy::prelude::*;
use thiserror::Error;

use crate::{
    assets::{load_phase, LoadPhase},
    shaders::{paths, request_shader_sources, ShaderSources},
};

#[derive(Clone, Copy, Default, Eq, PartialEq, Debug, Hash, States)]
pub enum BootState {
    #[default]
    FetchingShaders,
    Ready,
    Aborted,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BootstrapError {
    #[error("failed to fetch shader {path}: {reason}")]
    ShaderFetch { path: &'static str, reason: String },
}

/// Outcome of the shader fetch, refreshed every frame until it settles.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub enum ShaderFetchStatus {
    #[default]
    Pending,
    Fetched,
    Failed(BootstrapError),
}

/// Combines the load phases of both stages. The first failure wins.
pub fn shader_fetch_status(vertex: LoadPhase, fragment: LoadPhase) -> ShaderFetchStatus {
    let stages = [
        (paths::POND_VERTEX_SHADER, vertex),
        (paths::POND_FRAGMENT_SHADER, fragment),
    ];

    let mut all_ready = true;
    for (path, phase) in stages {
        match phase {
            LoadPhase::Failed(reason) => {
                return ShaderFetchStatus::Failed(BootstrapError::ShaderFetch { path, reason });
            }
            LoadPhase::Pending => all_ready = false,
            LoadPhase::Ready => {}
        }
    }

    if all_ready {
        ShaderFetchStatus::Fetched
    } else {
        ShaderFetchStatus::Pending
    }
}

/// Marker for every entity that belongs to the pond scene.
#[derive(Component, Debug, Default)]
pub struct PondEntity;

pub struct BootstrapPlugin;

impl Plugin for BootstrapPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<BootState>()
            .init_resource::<ShaderFetchStatus>()
            .add_systems(Startup, request_shader_sources)
            .add_systems(
                Update,
                (poll_shader_sources, advance_boot_state)
                    .chain()
                    .run_if(in_state(BootState::FetchingShaders)),
            );
    }
}

fn poll_shader_sources(
    asset_server: Res<AssetServer>,
    sources: Res<ShaderSources>,
    mut status: ResMut<ShaderFetchStatus>,
) {
    let next = shader_fetch_status(
        load_phase(&asset_server, sources.vertex.id()),
        load_phase(&asset_server, sources.fragment.id()),
    );
    status.set_if_neq(next);
}

pub fn advance_boot_state(
    status: Res<ShaderFetchStatus>,
    mut next_state: ResMut<NextState<BootState>>,
) {
    match status.as_ref() {
        ShaderFetchStatus::Pending => {}
        ShaderFetchStatus::Fetched => {
            info!("Shaders fetched, building pond scene");
            next_state.set(BootState::Ready);
        }
        ShaderFetchStatus::Failed(err) => {
            error!("Scene bootstrap aborted: {}", err);
            next_state.set(BootState::Aborted);
        }
    }
}
