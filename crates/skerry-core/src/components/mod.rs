//! Component definitions for the simulation.
//!
//! Components are pure data structs; behavior lives in systems and in the
//! session methods on `Simulation`.

mod agents;
mod common;
mod island;

pub use agents::*;
pub use common::*;
pub use island::*;
