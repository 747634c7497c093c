//! Per-tick systems operating over islands and the agent world.

mod economy;
mod shipping;
mod wandering;

pub use economy::{growth_tick, ResourceTotals};
pub use shipping::{ship_transit_system, Arrival};
pub use wandering::wander_system;
