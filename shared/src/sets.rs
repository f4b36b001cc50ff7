use bevy::prelude::*;

/// Per-frame ordering: clicks are turned into ripples before the water
/// uniforms are refreshed, and the fish move last.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PondUpdateSet {
    Input,
    Water,
    Fish,
}
