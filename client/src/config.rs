use bevy::prelude::*;
use koi_shared::PondConfig;
use ron::ser::PrettyConfig;
use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(String),
}

pub fn parse_pond_config(content: &str) -> Result<PondConfig, ConfigError> {
    ron::de::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn write_pond_config(config: &PondConfig, path: &Path) -> Result<(), ConfigError> {
    let pretty_config = PrettyConfig::new()
        .with_depth_limit(3)
        .with_separate_tuple_members(true)
        .with_enumerate_arrays(false);

    let serialized = ron::ser::to_string_pretty(config, pretty_config)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(serialized.as_bytes())?;
    Ok(())
}

/// Where the pond config came from. Logged once the log subscriber exists.
#[derive(Resource, Debug)]
pub enum ConfigSource {
    Default,
    File(PathBuf),
    WroteDefaults(PathBuf),
    Fallback { path: PathBuf, error: ConfigError },
}

/// Reads the pond config from `path`, falling back to defaults.
///
/// A missing file is created with the default values so it can be edited.
/// Any other failure leaves the file untouched.
pub fn load_pond_config(path: Option<&Path>) -> (PondConfig, ConfigSource) {
    let Some(path) = path else {
        return (PondConfig::default(), ConfigSource::Default);
    };

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let config = PondConfig::default();
            let source = match write_pond_config(&config, path) {
                Ok(()) => ConfigSource::WroteDefaults(path.to_path_buf()),
                Err(error) => ConfigSource::Fallback {
                    path: path.to_path_buf(),
                    error,
                },
            };
            return (config, source);
        }
        Err(e) => {
            return (
                PondConfig::default(),
                ConfigSource::Fallback {
                    path: path.to_path_buf(),
                    error: e.into(),
                },
            );
        }
    };

    match parse_pond_config(&content) {
        Ok(config) => (config, ConfigSource::File(path.to_path_buf())),
        Err(error) => (
            PondConfig::default(),
            ConfigSource::Fallback {
                path: path.to_path_buf(),
                error,
            },
        ),
    }
}

/// Startup system reporting the config source, then dropping the record.
pub fn log_config_source(mut commands: Commands, source: Option<Res<ConfigSource>>) {
    let Some(source) = source else {
        return;
    };

    match source.as_ref() {
        ConfigSource::Default => info!("Using default pond config"),
        ConfigSource::File(path) => info!("Loaded pond config from {:?}", path),
        ConfigSource::WroteDefaults(path) => warn!("No config at {:?}, wrote defaults", path),
        ConfigSource::Fallback { path, error } => {
            error!("Ignoring config {:?}, using defaults: {}", path, error)
        }
    }
    commands.remove_resource::<ConfigSource>();
}
