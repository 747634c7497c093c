//! Islands and biomes - the static terrain-derived entities of the world.
//!
//! Island economies are parameterized once at build time from a single
//! `cost` figure (distance from the map origin times area), so far-flung
//! large islands are richer and more expensive to settle than close ones.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::common::{Rect, Vec2};
use crate::noise::NoiseField;

/// Index into the biome table marking the first land biome; its `start_level`
/// is the land/water threshold of the whole simulation.
pub const LAND_BIOME: usize = 3;

/// Resource cost multipliers applied to an island's `cost` figure.
pub const WOOD_COLONIZE_RATE: f32 = 0.05;
pub const IRON_COLONIZE_RATE: f32 = 0.004;
pub const WOOD_STOCK_RATE: f32 = 0.02;
pub const WOOD_GROWTH_RATE: f32 = 0.002;
pub const IRON_STOCK_RATE: f32 = 0.005;
pub const PEOPLE_GROWTH_RATE: f32 = 0.00003;
pub const PEOPLE_MAX_RATE: f32 = 0.005;

/// Population seeded per unit of area when a colony bootstraps.
pub const PEOPLE_DENSITY: f32 = 0.001;

/// Harvest yield per worker per growth tick, before tax/efficiency scaling.
pub const WOOD_HARVEST_RATE: i32 = 3;
pub const IRON_HARVEST_RATE: i32 = 1;

/// Tax level at which worker efficiency holds steady.
pub const DEFAULT_TAXES: i32 = 67;
/// Divisor turning a tax deviation into an efficiency drift range.
pub const EFFICIENCY_DRIFT_DIVISOR: i32 = 5;

/// Extra iron granted to the bootstrap colony so it can afford its first
/// colonization before harvesting catches up.
pub const BOOTSTRAP_IRON_BUFFER: i32 = 3;

/// One band of the terrain color ramp. Only the land boundary's
/// `start_level` affects the simulation; colors are data for renderers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Biome {
    /// Height at which this biome starts
    pub start_level: f32,
    /// RGB display color
    pub color: [u8; 3],
}

impl Biome {
    pub fn new(start_level: f32, color: [u8; 3]) -> Self {
        Self { start_level, color }
    }
}

/// Default biome ramp from deep water to snow caps.
pub fn default_biomes() -> Vec<Biome> {
    vec![
        Biome::new(-1.0, [0, 0, 255]),
        Biome::new(-0.5, [0, 136, 255]),
        Biome::new(0.0, [97, 218, 255]),
        Biome::new(0.1, [251, 254, 145]),
        Biome::new(0.2, [33, 171, 42]),
        Biome::new(0.5, [184, 184, 205]),
        Biome::new(0.6, [255, 255, 255]),
    ]
}

/// A connected land mass with its economy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Island {
    /// Dense index within the session's island list
    pub index: u32,
    /// Bounding box over the island's cell centers, in world units
    pub bounds: Rect,
    /// Land area in world units squared
    pub area: f32,

    /// Wood price of colonizing this island
    pub wood_colonize: i32,
    /// Iron price of colonizing this island
    pub iron_colonize: i32,

    pub wood_count: i32,
    pub wood_growth: i32,
    pub wood_max: i32,
    pub iron_count: i32,

    pub people_count: u32,
    pub people_max: u32,
    pub people_growth: f32,
    /// Fractional population carried between growth ticks
    pub add_people_fraction: f32,

    pub colonized: bool,
    /// Harvest intensity, 0-100
    pub taxes: i32,
    /// Worker efficiency, 0-100; drifts in response to taxes
    pub efficiency: i32,
}

impl Island {
    /// Derive a new island's economy from its surveyed bounds and area.
    pub fn new(index: u32, bounds: Rect, area: f32) -> Self {
        let cost = bounds.center().distance(&Vec2::ZERO) * area;
        Self {
            index,
            bounds,
            area,
            wood_colonize: (cost * WOOD_COLONIZE_RATE) as i32,
            iron_colonize: (cost * IRON_COLONIZE_RATE) as i32,
            wood_count: (cost * WOOD_STOCK_RATE) as i32,
            wood_growth: (cost * WOOD_GROWTH_RATE) as i32,
            wood_max: (cost * WOOD_STOCK_RATE) as i32,
            iron_count: (cost * IRON_STOCK_RATE) as i32,
            people_count: 0,
            people_max: (cost * PEOPLE_MAX_RATE) as u32,
            people_growth: cost * PEOPLE_GROWTH_RATE,
            add_people_fraction: 0.0,
            colonized: false,
            taxes: DEFAULT_TAXES,
            efficiency: 50,
        }
    }

    /// Turn this island into the bootstrap colony: seed its population from
    /// its area, buffer its iron stock, and raise the population cap enough
    /// to field workers. Returns the seeded population.
    pub fn seed_colony(&mut self) -> u32 {
        self.colonized = true;
        self.iron_count *= BOOTSTRAP_IRON_BUFFER;
        self.people_max = self.people_max.max(3);
        self.people_count = ((self.area * PEOPLE_DENSITY) as u32)
            .max(2)
            .min(self.people_max);
        self.people_count
    }

    /// Random land position within the island's bounds. Rejection-samples the
    /// noise field a bounded number of times, then settles for the bounds
    /// center; placement is cosmetic so the fallback is harmless.
    pub fn random_land_point(
        &self,
        noise: &NoiseField,
        land_level: f32,
        rng: &mut impl Rng,
    ) -> Vec2 {
        for _ in 0..32 {
            let p = Vec2::new(
                rng.gen_range(self.bounds.min.x..=self.bounds.max.x),
                rng.gen_range(self.bounds.min.y..=self.bounds.max.y),
            );
            if noise.is_land(p, land_level) {
                return p;
            }
        }
        self.bounds.center()
    }
}
