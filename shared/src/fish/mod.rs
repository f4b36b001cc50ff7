//! Autonomous koi swimming: straight runs, bounces off the pond edge and
//! periodic turns limited to a cone around the current heading.

pub mod motion;

pub use motion::*;
