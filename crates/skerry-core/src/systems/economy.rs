//! Colony growth and harvesting.
//!
//! Each colonized island runs the same growth tick: wood regrows toward its
//! cap, population compounds with the square root of the head count, workers
//! harvest stock into the crown totals, and efficiency drifts in response to
//! the tax level. Ticks are discrete; the session fires one per island every
//! growth period.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::{
    Island, DEFAULT_TAXES, EFFICIENCY_DRIFT_DIVISOR, IRON_HARVEST_RATE, WOOD_HARVEST_RATE,
};

/// Crown stockpiles, fed by island harvests and spent on colonization.
/// `people` counts every settler alive anywhere, including ships in transit.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceTotals {
    pub wood: i64,
    pub iron: i64,
    pub people: u64,
}

/// Run one growth tick on an island. Uncolonized islands are inert. Returns
/// the number of settlers born this tick so the session can spawn them.
pub fn growth_tick(island: &mut Island, totals: &mut ResourceTotals, rng: &mut impl Rng) -> u32 {
    if !island.colonized {
        return 0;
    }

    island.wood_count = (island.wood_count + island.wood_growth).min(island.wood_max);

    // Population needs a founding pair. Fractional growth carries over
    // between ticks; whole settlers beyond the cap are lost.
    let mut added = 0;
    if island.people_count >= 2 {
        island.add_people_fraction += island.people_growth
            * (island.people_count as f32).sqrt()
            * island.efficiency as f32
            / 100.0;
        let whole = island.add_people_fraction as u32;
        if whole > 0 {
            added = whole.min(island.people_max.saturating_sub(island.people_count));
            island.people_count += added;
            island.add_people_fraction -= whole as f32;
            totals.people += u64::from(added);
        }
    }

    let labor =
        island.people_count as f32 * island.taxes as f32 / 100.0 * island.efficiency as f32
            / 100.0;
    let wood_take = ((WOOD_HARVEST_RATE as f32 * labor) as i32).min(island.wood_count);
    let iron_take = ((IRON_HARVEST_RATE as f32 * labor) as i32).min(island.iron_count);
    island.wood_count -= wood_take;
    island.iron_count -= iron_take;
    totals.wood += i64::from(wood_take);
    totals.iron += i64::from(iron_take);

    // Taxes away from the default pull efficiency their way, one random
    // nudge per tick
    let span = (island.taxes - DEFAULT_TAXES).abs() / EFFICIENCY_DRIFT_DIVISOR;
    let drift = rng.gen_range(0..=span);
    if island.taxes > DEFAULT_TAXES {
        island.efficiency -= drift;
    } else {
        island.efficiency += drift;
    }
    island.efficiency = island.efficiency.clamp(0, 100);

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Rect, Vec2};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn colony() -> Island {
        // Center (30, 40), area 100 -> cost 5000
        let bounds = Rect::new(Vec2::new(25.0, 35.0), Vec2::new(35.0, 45.0));
        let mut island = Island::new(0, bounds, 100.0);
        island.seed_colony();
        island
    }

    #[test]
    fn test_uncolonized_island_is_inert() {
        let bounds = Rect::new(Vec2::new(25.0, 35.0), Vec2::new(35.0, 45.0));
        let mut island = Island::new(0, bounds, 100.0);
        let before = island.clone();
        let mut totals = ResourceTotals::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let added = growth_tick(&mut island, &mut totals, &mut rng);

        assert_eq!(added, 0);
        assert_eq!(island, before);
        assert_eq!(totals, ResourceTotals::default());
    }

    #[test]
    fn test_growth_invariants_hold() {
        for taxes in [0, 67, 100] {
            let mut island = colony();
            island.taxes = taxes;
            let mut totals = ResourceTotals::default();
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            let start_people = island.people_count;

            let mut born = 0;
            for _ in 0..1000 {
                born += growth_tick(&mut island, &mut totals, &mut rng);

                assert!(island.people_count <= island.people_max);
                assert!((0..=100).contains(&island.efficiency));
                assert!(island.wood_count >= 0 && island.wood_count <= island.wood_max);
                assert!(island.iron_count >= 0);
                assert!(island.add_people_fraction >= 0.0);
                assert!(island.add_people_fraction < 1.0);
                assert!(totals.wood >= 0 && totals.iron >= 0);
            }

            // Every birth is accounted for in the crown total
            assert_eq!(totals.people, u64::from(born));
            assert_eq!(island.people_count, start_people + born);
        }
    }

    #[test]
    fn test_wood_stock_caps_at_max() {
        let mut island = colony();
        island.taxes = 0;
        island.wood_count = island.wood_max;
        let mut totals = ResourceTotals::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        growth_tick(&mut island, &mut totals, &mut rng);
        assert_eq!(island.wood_count, island.wood_max);
    }

    #[test]
    fn test_population_caps_at_max() {
        let mut island = colony();
        island.taxes = 0;
        island.people_max = 4;
        island.people_growth = 10.0;
        let mut totals = ResourceTotals::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        for _ in 0..10 {
            growth_tick(&mut island, &mut totals, &mut rng);
        }
        assert_eq!(island.people_count, 4);
        assert_eq!(totals.people, 2);
    }

    #[test]
    fn test_taxes_drive_efficiency() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut totals = ResourceTotals::default();

        let mut squeezed = colony();
        squeezed.taxes = 100;
        for _ in 0..300 {
            growth_tick(&mut squeezed, &mut totals, &mut rng);
        }
        assert_eq!(squeezed.efficiency, 0);

        let mut lax = colony();
        lax.taxes = 0;
        for _ in 0..300 {
            growth_tick(&mut lax, &mut totals, &mut rng);
        }
        assert_eq!(lax.efficiency, 100);

        let mut steady = colony();
        for _ in 0..300 {
            growth_tick(&mut steady, &mut totals, &mut rng);
        }
        assert_eq!(steady.efficiency, 50);
    }

    #[test]
    fn test_harvest_moves_stock_to_totals() {
        let mut island = colony();
        island.people_count = 10;
        island.efficiency = 100;
        let mut totals = ResourceTotals::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        growth_tick(&mut island, &mut totals, &mut rng);

        // labor = 10 * 67/100 * 100/100 = 6.7 workers
        assert_eq!(totals.wood, 20);
        assert_eq!(totals.iron, 6);
        assert_eq!(island.wood_count, 80);
        assert_eq!(island.iron_count, 69);
    }
}
