mod assets;
mod bootstrap;
mod camera;
mod config;
mod constants;
mod shaders;
mod ui;
mod world;

use std::path::PathBuf;

use assets::{report_scenery_loads, PendingScenery};
use bevy::{log::LogPlugin, prelude::*, window::PresentMode};
use bootstrap::{BootState, BootstrapPlugin};
use clap::Parser;
use constants::{DEFAULT_ASSETS_FOLDER, LOG_FILTER, WINDOW_TITLE};
use koi_shared::sets::PondUpdateSet;
use rand::{rngs::StdRng, SeedableRng};
use shaders::PondWaterMaterialPlugin;
use ui::InspectorPlugin;
use world::{
    spawn_boundary_frame, spawn_lights, spawn_lily_pads, FishPlugin, FishRng, WaterPlugin,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        help = "Overrides the asset folder path, defaults to ../data relative to the client crate"
    )]
    assets_folder_path: Option<String>,

    #[arg(short, long, help = "RON file with pond parameters, created with defaults if missing")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Number of koi, overrides the config file")]
    fish_count: Option<usize>,

    #[arg(long, help = "Seed for fish spawning and turning")]
    seed: Option<u64>,

    /// Show a live editor for the pond parameters
    #[arg(long)]
    inspector: bool,
}

fn main() {
    let args = Args::parse();

    let (mut pond_config, config_source) = config::load_pond_config(args.config.as_deref());
    if let Some(count) = args.fish_count {
        pond_config.fish.count = count;
    }

    let fish_rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(AssetPlugin {
                file_path: args
                    .assets_folder_path
                    .unwrap_or_else(|| DEFAULT_ASSETS_FOLDER.to_string()),
                ..Default::default()
            })
            .set(LogPlugin {
                filter: LOG_FILTER.to_string(),
                ..default()
            })
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: WINDOW_TITLE.to_string(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            }),
    );

    if args.inspector {
        app.add_plugins(InspectorPlugin);
    }

    app.insert_resource(ClearColor(Color::BLACK))
        .insert_resource(pond_config)
        .insert_resource(config_source)
        .insert_resource(FishRng(fish_rng))
        .init_resource::<PendingScenery>()
        .add_plugins((
            PondWaterMaterialPlugin,
            BootstrapPlugin,
            WaterPlugin,
            FishPlugin,
        ))
        .configure_sets(
            Update,
            (
                PondUpdateSet::Input,
                PondUpdateSet::Water,
                PondUpdateSet::Fish,
            )
                .chain()
                .run_if(in_state(BootState::Ready)),
        )
        .add_systems(Startup, config::log_config_source)
        .add_systems(
            OnEnter(BootState::Ready),
            (
                camera::spawn_camera,
                spawn_lights,
                spawn_boundary_frame,
                spawn_lily_pads,
            ),
        )
        .add_systems(
            Update,
            (
                camera::fit_camera_to_window.in_set(PondUpdateSet::Input),
                report_scenery_loads.run_if(in_state(BootState::Ready)),
            ),
        )
        .run();
}
