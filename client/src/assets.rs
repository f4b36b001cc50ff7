//! Load-state polling shared by the bootstrap, water and fish state machines.

use bevy::{
    asset::{LoadState, RecursiveDependencyLoadState, UntypedAssetId},
    prelude::*,
};

/// Coarse view of an asset's load progress, dependencies included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Pending,
    Ready,
    Failed(String),
}

/// Reports `Failed` as soon as the asset or any of its dependencies fails.
pub fn load_phase(asset_server: &AssetServer, id: impl Into<UntypedAssetId>) -> LoadPhase {
    let id = id.into();

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(id) {
        return LoadPhase::Failed(err.to_string());
    }
    if let Some(RecursiveDependencyLoadState::Failed(err)) =
        asset_server.get_recursive_dependency_load_state(id)
    {
        return LoadPhase::Failed(err.to_string());
    }

    if asset_server.is_loaded_with_dependencies(id) {
        LoadPhase::Ready
    } else {
        LoadPhase::Pending
    }
}

/// Scenery whose only failure handling is a log line.
#[derive(Resource, Default)]
pub struct PendingScenery {
    pub assets: Vec<(&'static str, UntypedHandle)>,
}

impl PendingScenery {
    pub fn track(&mut self, path: &'static str, handle: impl Into<UntypedHandle>) {
        self.assets.push((path, handle.into()));
    }
}

/// Logs failed scenery loads once and stops tracking settled ones.
pub fn report_scenery_loads(asset_server: Res<AssetServer>, mut pending: ResMut<PendingScenery>) {
    pending
        .assets
        .retain(|(path, handle)| match load_phase(&asset_server, handle.id()) {
            LoadPhase::Pending => true,
            LoadPhase::Ready => {
                debug!("Loaded {}", path);
                false
            }
            LoadPhase::Failed(reason) => {
                error!("Error loading {}: {}", path, reason);
                false
            }
        });
}
