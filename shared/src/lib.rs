//! Engine-independent simulation for the koi pond.
//!
//! Everything here is plain data and math: the fish motion model, the ripple
//! ring buffer and the tunable configuration. The client crate drives it from
//! Bevy systems.

pub mod config;
pub mod constants;
pub mod fish;
pub mod sets;
pub mod water;

pub use config::*;
pub use constants::*;
