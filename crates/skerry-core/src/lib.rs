//! Skerry Core - Island Colony Simulation Engine
//!
//! A deterministic simulation of an archipelago colony: a gradient-noise
//! height field is rasterized into a land/water grid, connected land masses
//! become islands with derived economies, and agents (settler ships, wandering
//! colonists) move over the precomputed sea routes between them.
//!
//! # Architecture
//!
//! Terrain and islands are plain data owned by the [`engine::Simulation`]
//! session; agents live in an Entity Component System via `hecs`:
//! - **Entities**: ships in transit, colonists on land
//! - **Components**: pure data (Position, Ship, Colonist)
//! - **Systems**: logic that queries and updates components each tick
//!
//! # Example
//!
//! ```rust,no_run
//! use skerry_core::prelude::*;
//! use skerry_core::generation::WorldConfig;
//!
//! let mut sim = Simulation::new(WorldConfig { seed: 7, ..Default::default() });
//!
//! // Rasterize the noise field and extract islands
//! sim.generate();
//!
//! // Run simulation
//! loop {
//!     sim.update(1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod noise;
pub mod grid;
pub mod generation;
pub mod pathfinding;
pub mod systems;
pub mod engine;
pub mod persistence;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::Simulation;
    pub use crate::generation::WorldConfig;
    pub use crate::noise::{NoiseField, NoiseParams};
    pub use crate::systems::ResourceTotals;
}
