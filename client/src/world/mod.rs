pub mod fish;
pub mod scenery;
pub mod water;

pub use fish::*;
pub use scenery::*;
pub use water::*;
