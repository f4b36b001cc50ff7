pub const DEFAULT_ASSETS_FOLDER: &str = "../data";
pub const WINDOW_TITLE: &str = "Koi Pond";

pub const FISH_MODEL_PATH: &str = "models/koi_fish.glb";
pub const LILY_PADS_MODEL_PATH: &str = "models/lily_pads.glb";
pub const POND_BASE_TEXTURE_PATH: &str = "textures/pondbase.webp";

pub const LOG_FILTER: &str = "info,wgpu=error,naga=warn";
