//! Generation - procedural creation of the archipelago.

mod labeling;
mod progress;
mod world;

pub use labeling::*;
pub use progress::*;
pub use world::*;
