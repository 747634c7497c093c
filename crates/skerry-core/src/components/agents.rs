//! Agent components: settler ships at sea and colonists on land.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::Vec2;

/// Ship travel speed in world units per second
pub const SHIP_SPEED: f32 = 25.0;

/// Colonist walking speed range
pub const COLONIST_MIN_SPEED: f32 = 0.2;
pub const COLONIST_MAX_SPEED: f32 = 3.0;

/// Colonist sway animation rate range, degrees per second
pub const COLONIST_MIN_SWAY_SPEED: f32 = 20.0;
pub const COLONIST_MAX_SWAY_SPEED: f32 = 100.0;

/// Sway reverses direction beyond this angle
pub const SWAY_LIMIT_DEG: f32 = 15.0;

/// Attempts at re-rolling a walkable heading before a colonist stays put
pub const HEADING_RETRIES: usize = 5;

/// World-space position of an agent entity
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

/// A settler transport following a precomputed sea route.
///
/// Ships are spawned by a dispatch, follow `path` waypoint by waypoint, and
/// are despawned by the session once `reached` and the cargo is delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ship {
    /// Island the settlers departed from
    pub source: u32,
    /// Island the settlers are bound for
    pub target: u32,
    /// Settlers aboard
    pub people: u32,
    /// Waypoints from launch point to the target's coastal approach
    pub path: Vec<Vec2>,
    pub next_waypoint: usize,
    /// Unit direction toward the current waypoint
    pub heading: Vec2,
    /// Terminal: the path is exhausted and delivery is pending
    pub reached: bool,
}

impl Ship {
    pub fn new(source: u32, target: u32, people: u32, launch: Vec2, path: Vec<Vec2>) -> Self {
        let heading = match path.first() {
            Some(first) => (*first - launch).normalize(),
            None => Vec2::ZERO,
        };
        Self {
            source,
            target,
            people,
            path,
            next_waypoint: 0,
            heading,
            reached: false,
        }
    }
}

/// A colonist wandering their home island. Purely decorative between growth
/// ticks; the owning island's `people_count` is the authoritative population.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Colonist {
    /// Owning island index
    pub island: u32,
    /// Direction of travel in degrees
    pub heading_deg: f32,
    /// Cosmetic sway angle in degrees, oscillating within the sway limit
    pub sway_deg: f32,
    /// Current sway direction, +1 or -1
    pub sway_dir: f32,
    /// Walking speed in world units per second
    pub speed: f32,
    /// Sway rate in degrees per second
    pub sway_speed: f32,
}

impl Colonist {
    pub fn new(island: u32, rng: &mut impl Rng) -> Self {
        Self {
            island,
            heading_deg: rng.gen_range(0.0..360.0),
            sway_deg: rng.gen_range(-SWAY_LIMIT_DEG..SWAY_LIMIT_DEG),
            sway_dir: 1.0,
            speed: rng.gen_range(COLONIST_MIN_SPEED..COLONIST_MAX_SPEED),
            sway_speed: rng.gen_range(COLONIST_MIN_SWAY_SPEED..COLONIST_MAX_SWAY_SPEED),
        }
    }
}
