//! World building - from noise field to islands with economies.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::labeling::{label_components, Labeled};
use super::progress::BuildProgress;
use crate::components::{default_biomes, Biome, Island, Rect, Vec2, LAND_BIOME};
use crate::grid::WorldGrid;
use crate::noise::{NoiseField, NoiseParams};
use crate::systems::ResourceTotals;

/// Configuration for world generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldConfig {
    pub seed: i32,
    /// Noise query scale
    pub scale: f32,
    /// Noise query offset
    pub offset: Vec2,
    /// Map extent in world units, centered on the origin
    pub extent: Vec2,
    /// Raster cell spacing in world units
    pub step: f32,
    /// Minimum area for a land mass to count as an island
    pub min_island_area: f32,
    /// Seconds between growth ticks
    pub growth_period: f64,
    /// Terrain color ramp; index [`LAND_BIOME`] marks the land threshold
    pub biomes: Vec<Biome>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 1.0,
            offset: Vec2::ZERO,
            extent: Vec2::new(300.0, 300.0),
            step: 0.5,
            min_island_area: 125.0,
            growth_period: 1.0,
            biomes: default_biomes(),
        }
    }
}

impl WorldConfig {
    pub fn noise_params(&self) -> NoiseParams {
        NoiseParams {
            seed: self.seed,
            scale: self.scale,
            offset: self.offset,
        }
    }

    /// Height at which water turns to land
    pub fn land_level(&self) -> f32 {
        self.biomes
            .get(LAND_BIOME)
            .map(|b| b.start_level)
            .unwrap_or(0.1)
    }
}

/// Output of a world build. A world with no surviving islands is a valid
/// degenerate result; retrying with a different seed is the caller's call.
#[derive(Debug)]
pub struct BuiltWorld {
    pub grid: WorldGrid,
    pub islands: Vec<Island>,
    pub totals: ResourceTotals,
    /// Bootstrap colony, colonized and seeded at build time
    pub start_island: Option<u32>,
}

/// Rasterize, label, and parameterize a world.
pub fn build_world(
    noise: &NoiseField,
    config: &WorldConfig,
    progress: Option<&BuildProgress>,
) -> BuiltWorld {
    let report = |fraction: f32| {
        if let Some(p) = progress {
            p.set_fraction(fraction);
        }
    };

    // The raster sweep dominates build time
    let grid = WorldGrid::rasterize(
        noise,
        config.extent,
        config.step,
        config.land_level(),
        |f| report(0.7 * f),
    );

    let labeled = label_components(&grid);
    report(0.9);

    let mut islands = islands_from_labeled(&grid, &labeled, config.min_island_area);
    let mut totals = ResourceTotals::default();
    let start_island = bootstrap_colony(&mut islands, &mut totals);
    report(1.0);

    info!(
        components = labeled.components.len(),
        islands = islands.len(),
        start_island = ?start_island,
        "world built"
    );

    BuiltWorld {
        grid,
        islands,
        totals,
        start_island,
    }
}

/// Convert labeled components into islands, discarding those below the
/// minimum area. Island indices are dense and follow component order.
pub fn islands_from_labeled(
    grid: &WorldGrid,
    labeled: &Labeled,
    min_island_area: f32,
) -> Vec<Island> {
    let step = grid.step();
    let min_cells = (min_island_area / (step * step)).ceil() as u32;

    let mut islands = Vec::new();
    for stats in &labeled.components {
        if stats.cells < min_cells {
            continue;
        }
        let bounds = Rect::new(
            grid.cell_center(stats.min_col, stats.min_row),
            grid.cell_center(stats.max_col, stats.max_row),
        );
        let area = stats.cells as f32 * step * step;
        islands.push(Island::new(islands.len() as u32, bounds, area));
    }
    islands
}

/// Colonize the island nearest the map origin and seed the session totals
/// from it. Returns the chosen island's index.
pub fn bootstrap_colony(islands: &mut [Island], totals: &mut ResourceTotals) -> Option<u32> {
    if islands.is_empty() {
        return None;
    }
    let mut nearest = 0;
    for i in 1..islands.len() {
        if islands[i].bounds.center().length() < islands[nearest].bounds.center().length() {
            nearest = i;
        }
    }

    let island = &mut islands[nearest];
    totals.wood = island.wood_count as i64;
    totals.iron = island.iron_count as i64;
    totals.people = island.seed_colony() as u64;
    Some(nearest as u32)
}
