//! Skerry Headless Validation Harness
//!
//! Drives the simulation engine end to end without a client: worldgen,
//! sea routing, colony economy, settler logistics, and persistence.
//! Runs entirely in-process with no rendering.
//!
//! Usage:
//!   cargo run -p skerry-simtest
//!   cargo run -p skerry-simtest -- --verbose
//!   cargo run -p skerry-simtest -- --json

use std::time::Instant;

use serde::Serialize;
use skerry_core::components::{Ship, Vec2, BOOTSTRAP_IRON_BUFFER};
use skerry_core::engine::Simulation;
use skerry_core::generation::{
    bootstrap_colony, build_world, islands_from_labeled, label_components, spawn_build,
    BuiltWorld, WorldConfig,
};
use skerry_core::grid::WorldGrid;
use skerry_core::noise::{NoiseField, NoiseParams};
use skerry_core::pathfinding::{find_path, RouteTree};
use skerry_core::persistence::SaveError;
use skerry_core::systems::ResourceTotals;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// ── Test harness ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

#[derive(Serialize)]
struct HarnessReport<'a> {
    passed: usize,
    failed: usize,
    results: &'a [TestResult],
}

fn main() -> anyhow::Result<()> {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let json = std::env::args().any(|a| a == "--json");

    if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    println!("=== Skerry Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Noise field determinism
    results.extend(validate_noise_field(verbose));

    // 2. World generation & island survey
    results.extend(validate_world_generation(verbose));

    // 3. Sea-route trees & point search
    results.extend(validate_routing(verbose));

    // 4. Colony economy
    results.extend(validate_economy(verbose));

    // 5. Settler logistics end to end
    results.extend(validate_logistics(verbose));

    // 6. Session persistence
    results.extend(validate_persistence(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if json {
        let report = HarnessReport {
            passed,
            failed,
            results: &results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

// ── Fixtures ────────────────────────────────────────────────────────────

/// Survey-sized config shared by the harness fixtures. The short growth
/// period makes every `update(0.1)` call run a growth tick.
fn worldgen_config(seed: i32) -> WorldConfig {
    WorldConfig {
        seed,
        extent: Vec2::new(80.0, 80.0),
        step: 1.0,
        min_island_area: 15.0,
        growth_period: 0.05,
        ..Default::default()
    }
}

/// First seed in a small scan whose world keeps at least `min_islands`
/// islands and some open water. Worldgen is deterministic, so a seed that
/// qualifies keeps qualifying; the scan just avoids hardcoding one.
fn find_world(min_islands: usize) -> Option<(WorldConfig, BuiltWorld)> {
    for seed in 1..=40 {
        let config = worldgen_config(seed);
        let noise = NoiseField::new(config.noise_params());
        let built = build_world(&noise, &config, None);
        if built.islands.len() >= min_islands
            && built.grid.land_cell_count() < built.grid.cell_count()
        {
            return Some((config, built));
        }
    }
    None
}

/// Two-island mask world with hand-picked geometry: a 10x10 block far
/// enough from the origin to derive a working economy (cost 2000), and a
/// smaller outlier further out so the bootstrap picks the block.
fn economy_fixture() -> Simulation {
    let cols = 60;
    let rows = 30;
    let mut land = vec![false; cols * rows];
    for row in 10..=19 {
        for col in 45..=54 {
            land[row * cols + col] = true;
        }
    }
    for row in 13..=16 {
        for col in 5..=8 {
            land[row * cols + col] = true;
        }
    }
    let grid = WorldGrid::from_mask(cols, rows, 1.0, land);
    let labeled = label_components(&grid);
    let mut islands = islands_from_labeled(&grid, &labeled, 10.0);
    let mut totals = ResourceTotals::default();
    let start_island = bootstrap_colony(&mut islands, &mut totals);
    let built = BuiltWorld {
        grid,
        islands,
        totals,
        start_island,
    };

    let config = WorldConfig {
        seed: 9,
        extent: Vec2::new(60.0, 30.0),
        step: 1.0,
        min_island_area: 10.0,
        growth_period: 0.05,
        ..Default::default()
    };
    Simulation::from_built(config, built)
}

/// Centers of the first `len` same-class cells in a row, scanning row-major.
fn find_axis_run(grid: &WorldGrid, want_land: bool, len: usize) -> Option<(Vec2, Vec2)> {
    for row in 0..grid.rows() {
        let mut run = 0;
        for col in 0..grid.cols() {
            if grid.is_land(col, row) == want_land {
                run += 1;
            } else {
                run = 0;
            }
            if run == len {
                return Some((grid.cell_center(col + 1 - len, row), grid.cell_center(col, row)));
            }
        }
    }
    None
}

// ── 1. Noise Field ──────────────────────────────────────────────────────

fn validate_noise_field(_verbose: bool) -> Vec<TestResult> {
    println!("--- Noise Field ---");
    let mut results = Vec::new();

    let params = NoiseParams {
        seed: 42,
        scale: 1.3,
        offset: Vec2::new(3.0, -2.0),
    };
    let field = NoiseField::new(params);
    let twin = NoiseField::new(params);
    let other = NoiseField::new(NoiseParams { seed: 43, ..params });

    let mut identical = true;
    let mut diverged = false;
    let mut finite = true;
    let mut min_h = f32::INFINITY;
    let mut max_h = f32::NEG_INFINITY;

    for i in -40..=40 {
        for j in -40..=40 {
            let p = Vec2::new(i as f32 * 0.37, j as f32 * 0.37);
            let h = field.height(p);
            if h.to_bits() != twin.height(p).to_bits() {
                identical = false;
            }
            if (h - other.height(p)).abs() > f32::EPSILON {
                diverged = true;
            }
            if !h.is_finite() {
                finite = false;
            }
            min_h = min_h.min(h);
            max_h = max_h.max(h);
        }
    }

    results.push(TestResult {
        name: "noise_deterministic".into(),
        passed: identical,
        detail: "same params reproduce every sample bit for bit".into(),
    });
    results.push(TestResult {
        name: "noise_seed_sensitive".into(),
        passed: diverged,
        detail: "seed 42 and seed 43 fields differ".into(),
    });
    results.push(TestResult {
        name: "noise_heights_sane".into(),
        passed: finite && max_h > min_h,
        detail: format!("6561 samples in [{:.3}, {:.3}]", min_h, max_h),
    });

    // classification splits exactly on the land level
    let p = Vec2::new(1.0, 1.0);
    let h = field.height(p);
    results.push(TestResult {
        name: "noise_land_threshold".into(),
        passed: field.is_land(p, h - 0.01) && !field.is_land(p, h + 0.01),
        detail: format!("height {:.3} splits on the land level", h),
    });

    results
}

// ── 2. World Generation ─────────────────────────────────────────────────

fn validate_world_generation(verbose: bool) -> Vec<TestResult> {
    println!("--- World Generation ---");
    let mut results = Vec::new();

    let config = worldgen_config(1234);
    let noise = NoiseField::new(config.noise_params());

    let (progress, handle) = spawn_build(noise, config.clone());
    let built = match handle.join() {
        Ok(built) => built,
        Err(_) => {
            results.push(TestResult {
                name: "worldgen_build_thread".into(),
                passed: false,
                detail: "build thread panicked".into(),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "worldgen_progress_completes".into(),
        passed: progress.is_finished() && (progress.fraction() - 1.0).abs() < f32::EPSILON,
        detail: format!("fraction {:.2} reported finished", progress.fraction()),
    });

    results.push(TestResult {
        name: "worldgen_grid_extent".into(),
        passed: built.grid.cols() == 81 && built.grid.rows() == 81,
        detail: format!(
            "{}x{} cells at step {}",
            built.grid.cols(),
            built.grid.rows(),
            built.grid.step()
        ),
    });

    let surveyed = built
        .islands
        .iter()
        .all(|i| i.area >= config.min_island_area && i.bounds.contains(&i.bounds.center()));
    results.push(TestResult {
        name: "worldgen_island_survey".into(),
        passed: surveyed,
        detail: format!(
            "{} islands, all at least {} area",
            built.islands.len(),
            config.min_island_area
        ),
    });

    let dense = built
        .islands
        .iter()
        .enumerate()
        .all(|(i, island)| island.index as usize == i);
    results.push(TestResult {
        name: "worldgen_dense_indices".into(),
        passed: dense,
        detail: "island indices follow survey order".into(),
    });

    match built.start_island {
        Some(start) => {
            let island = &built.islands[start as usize];
            results.push(TestResult {
                name: "worldgen_bootstrap_colony".into(),
                passed: island.colonized
                    && island.people_count >= 2
                    && built.totals.people == u64::from(island.people_count)
                    && built.totals.wood == i64::from(island.wood_count)
                    && built.totals.iron * i64::from(BOOTSTRAP_IRON_BUFFER)
                        == i64::from(island.iron_count),
                detail: format!(
                    "island {} starts with {} people",
                    start, island.people_count
                ),
            });
        }
        None => {
            results.push(TestResult {
                name: "worldgen_bootstrap_colony".into(),
                passed: built.islands.is_empty(),
                detail: "no islands, no bootstrap".into(),
            });
        }
    }

    let again = build_world(&noise, &config, None);
    results.push(TestResult {
        name: "worldgen_deterministic".into(),
        passed: again.islands == built.islands
            && again.totals == built.totals
            && again.start_island == built.start_island
            && again.grid.land_cell_count() == built.grid.land_cell_count(),
        detail: "same seed rebuilds the identical world".into(),
    });

    if verbose {
        println!("  Islands (seed {}):", config.seed);
        for island in &built.islands {
            println!(
                "    #{:2} area {:6.1} at ({:6.1}, {:6.1}) colonize {}w/{}i",
                island.index,
                island.area,
                island.bounds.center().x,
                island.bounds.center().y,
                island.wood_colonize,
                island.iron_colonize
            );
        }
    }

    results
}

// ── 3. Sea Routing ──────────────────────────────────────────────────────

fn validate_routing(_verbose: bool) -> Vec<TestResult> {
    println!("--- Sea Routing ---");
    let mut results = Vec::new();

    let Some((config, built)) = find_world(1) else {
        results.push(TestResult {
            name: "routing_fixture".into(),
            passed: false,
            detail: "no island world within 40 seeds".into(),
        });
        return results;
    };
    let grid = &built.grid;
    let noise = NoiseField::new(config.noise_params());

    let mut rooted_in_water = true;
    let mut trees = Vec::new();
    for island in &built.islands {
        match RouteTree::build(grid, island) {
            Some(tree) => {
                if grid.is_land_cell(tree.root() as usize) {
                    rooted_in_water = false;
                }
                trees.push(tree);
            }
            None => rooted_in_water = false,
        }
    }
    results.push(TestResult {
        name: "routing_tree_per_island".into(),
        passed: rooted_in_water && trees.len() == built.islands.len(),
        detail: format!("{} trees rooted in open water", trees.len()),
    });

    // walk the farthest routed cell of every tree back to its coast
    let mut reach = true;
    let mut land_routed = false;
    let mut longest = 0usize;
    for tree in &trees {
        let mut far: Option<(f32, u32)> = None;
        for cell in 0..grid.cell_count() as u32 {
            if grid.is_land_cell(cell as usize) {
                if tree.has_route(cell) {
                    land_routed = true;
                }
                continue;
            }
            if !tree.has_route(cell) {
                continue;
            }
            let cost = tree.cost(cell);
            if cost.is_finite() && far.map_or(true, |(best, _)| cost > best) {
                far = Some((cost, cell));
            }
        }
        let Some((_, cell)) = far else {
            reach = false;
            continue;
        };
        let path = tree.path_from(grid, grid.cell_index_center(cell as usize));
        let coast = grid.cell_index_center(tree.root() as usize);
        if path.is_empty()
            || *path.last().unwrap() != coast
            || path
                .windows(2)
                .any(|w| w[0].distance(&w[1]) > grid.step() * std::f32::consts::SQRT_2 + 1e-4)
        {
            reach = false;
        }
        longest = longest.max(path.len());
    }
    results.push(TestResult {
        name: "routing_paths_reach_coast".into(),
        passed: reach,
        detail: format!("longest route walks {} waypoints", longest),
    });
    results.push(TestResult {
        name: "routing_land_never_routes".into(),
        passed: !land_routed,
        detail: "no tree claims a land cell".into(),
    });

    // point search along a straight water corridor
    let arrive = grid.step() * grid.step() * 0.5;
    match find_axis_run(grid, false, 4) {
        Some((start, goal)) => {
            let path = find_path(
                &noise,
                grid.bounds(),
                config.land_level(),
                start,
                goal,
                false,
                grid.step(),
            );
            let ok = !path.is_empty()
                && path.last().unwrap().distance_squared(&goal) < arrive
                && path.iter().all(|p| !noise.is_land(*p, config.land_level()));
            results.push(TestResult {
                name: "routing_point_search_water".into(),
                passed: ok,
                detail: format!("{} waypoints across open water", path.len()),
            });
        }
        None => results.push(TestResult {
            name: "routing_point_search_water".into(),
            passed: false,
            detail: "no straight water run in the fixture".into(),
        }),
    }

    // and along a land corridor, where one exists
    match find_axis_run(grid, true, 4) {
        Some((start, goal)) => {
            let path = find_path(
                &noise,
                grid.bounds(),
                config.land_level(),
                start,
                goal,
                true,
                grid.step(),
            );
            let ok = !path.is_empty()
                && path.last().unwrap().distance_squared(&goal) < arrive
                && path.iter().all(|p| noise.is_land(*p, config.land_level()));
            results.push(TestResult {
                name: "routing_point_search_land".into(),
                passed: ok,
                detail: format!("{} waypoints across island interior", path.len()),
            });
        }
        None => results.push(TestResult {
            name: "routing_point_search_land".into(),
            passed: true,
            detail: "no straight land run to search; skipped".into(),
        }),
    }

    results
}

// ── 4. Colony Economy ───────────────────────────────────────────────────

fn validate_economy(_verbose: bool) -> Vec<TestResult> {
    println!("--- Colony Economy ---");
    let mut results = Vec::new();

    let mut sim = economy_fixture();
    results.push(TestResult {
        name: "economy_fixture_bootstrap".into(),
        passed: sim.islands.len() == 2
            && sim.islands[0].colonized
            && !sim.islands[1].colonized
            && sim.totals.people == 2,
        detail: format!(
            "{} islands, colony of {} people",
            sim.islands.len(),
            sim.totals.people
        ),
    });

    // an unclaimed island never ticks
    let before = sim.islands[1].clone();
    let mut born = 0;
    for _ in 0..50 {
        born += sim.tick_growth(1);
    }
    results.push(TestResult {
        name: "economy_unclaimed_inert".into(),
        passed: born == 0 && sim.islands[1] == before,
        detail: "uncolonized island holds its survey state".into(),
    });

    // population climbs to the cap under default taxes; stocks stay in range
    let mut in_range = true;
    for _ in 0..600 {
        sim.tick_growth(0);
        let island = &sim.islands[0];
        if island.people_count > island.people_max
            || island.wood_count > island.wood_max
            || island.wood_count < 0
            || island.iron_count < 0
            || !(0.0..1.0).contains(&island.add_people_fraction)
            || !(0..=100).contains(&island.efficiency)
        {
            in_range = false;
        }
    }
    results.push(TestResult {
        name: "economy_growth_caps".into(),
        passed: in_range && sim.islands[0].people_count == sim.islands[0].people_max,
        detail: format!(
            "population {} of {}",
            sim.islands[0].people_count, sim.islands[0].people_max
        ),
    });

    results.push(TestResult {
        name: "economy_births_spawn_colonists".into(),
        passed: sim.colonist_count() as u32 == sim.islands[0].people_count,
        detail: format!("{} colonists wandering the colony", sim.colonist_count()),
    });

    // harvest drains island stocks into the session ledger; iron is finite
    results.push(TestResult {
        name: "economy_harvest_flows".into(),
        passed: sim.totals.wood > 40 && sim.totals.iron == 40 && sim.islands[0].iron_count == 0,
        detail: format!(
            "ledger at {}w/{}i after 600 ticks",
            sim.totals.wood, sim.totals.iron
        ),
    });

    let settled: u64 = sim.islands.iter().map(|i| u64::from(i.people_count)).sum();
    results.push(TestResult {
        name: "economy_ledger_conserved".into(),
        passed: sim.totals.people == settled,
        detail: format!("{} people settled, ledger agrees", settled),
    });

    // taxes steer efficiency toward the extremes
    sim.set_taxes(0, 100);
    for _ in 0..300 {
        sim.tick_growth(0);
    }
    let squeezed = sim.islands[0].efficiency;
    sim.set_taxes(0, 0);
    for _ in 0..300 {
        sim.tick_growth(0);
    }
    let relieved = sim.islands[0].efficiency;
    results.push(TestResult {
        name: "economy_taxes_steer_efficiency".into(),
        passed: squeezed == 0 && relieved == 100,
        detail: format!("taxes 100 → {}, taxes 0 → {}", squeezed, relieved),
    });

    results.push(TestResult {
        name: "economy_taxes_clamped".into(),
        passed: sim.set_taxes(0, 250) && sim.islands[0].taxes == 100 && !sim.set_taxes(99, 50),
        detail: "rates pinned to 0-100, unknown islands refused".into(),
    });

    results
}

// ── 5. Settler Logistics ────────────────────────────────────────────────

fn validate_logistics(verbose: bool) -> Vec<TestResult> {
    println!("--- Settler Logistics ---");
    let mut results = Vec::new();

    // Colonization is never retried inside the engine, so the harness plays
    // the colony: harvest until the cheapest reachable target is affordable,
    // then claim it. Iron never regrows, so worlds where no target fits the
    // colony's total iron are skipped up front.
    let mut fixture = None;
    'seeds: for seed in 1..=30 {
        let config = worldgen_config(seed);
        let mut sim = Simulation::new(config);
        sim.generate();
        if sim.islands.len() < 2 {
            continue;
        }
        let Some(start) = sim.islands.iter().find(|i| i.colonized) else {
            continue;
        };
        let iron_ceiling = sim.totals.iron + i64::from(start.iron_count);
        let Some(target) = sim
            .islands
            .iter()
            .filter(|i| !i.colonized && i64::from(i.iron_colonize) <= iron_ceiling)
            .min_by_key(|i| (i.iron_colonize, i.wood_colonize))
            .map(|i| i.index)
        else {
            continue;
        };

        for _ in 0..6000 {
            sim.update(0.1);
            let ledger = sim.totals;
            if sim.colonize(target) {
                fixture = Some((seed, sim, target, ledger));
                break 'seeds;
            }
        }
    }

    let Some((seed, mut sim, target, ledger)) = fixture else {
        results.push(TestResult {
            name: "logistics_fixture".into(),
            passed: false,
            detail: "no colonizable world within 30 seeds".into(),
        });
        return results;
    };

    let claimed = &sim.islands[target as usize];
    results.push(TestResult {
        name: "logistics_expedition_dispatched".into(),
        passed: claimed.colonized && sim.ship_count() == 1,
        detail: format!("seed {}, island {} claimed, expedition at sea", seed, target),
    });
    results.push(TestResult {
        name: "logistics_prices_paid".into(),
        passed: sim.totals.wood == ledger.wood - i64::from(claimed.wood_colonize)
            && sim.totals.iron == ledger.iron - i64::from(claimed.iron_colonize)
            && sim.totals.people == ledger.people,
        detail: format!(
            "{}w/{}i deducted from the ledger",
            claimed.wood_colonize, claimed.iron_colonize
        ),
    });

    // sail the expedition home, checking the population ledger every tick
    let clock = Instant::now();
    let mut conserved = true;
    let mut delivered_at = None;
    for tick in 0..40_000u32 {
        sim.update(0.1);
        let on_land: u64 = sim.islands.iter().map(|i| u64::from(i.people_count)).sum();
        let at_sea: u64 = sim
            .world
            .query::<&Ship>()
            .iter()
            .map(|(_, ship)| u64::from(ship.people))
            .sum();
        if sim.totals.people != on_land + at_sea {
            conserved = false;
            break;
        }
        if sim.ship_count() == 0 {
            delivered_at = Some(tick);
            break;
        }
    }
    let elapsed = clock.elapsed();

    results.push(TestResult {
        name: "logistics_population_conserved".into(),
        passed: conserved,
        detail: "ledger matches islands plus ships every tick".into(),
    });

    match delivered_at {
        Some(tick) => results.push(TestResult {
            name: "logistics_settlers_delivered".into(),
            passed: sim.islands[target as usize].people_count == 1,
            detail: format!(
                "settler ashore after {} ticks ({:.0} ticks/s)",
                tick + 1,
                f64::from(tick + 1) / elapsed.as_secs_f64().max(1e-9)
            ),
        }),
        None => results.push(TestResult {
            name: "logistics_settlers_delivered".into(),
            passed: false,
            detail: "expedition never arrived within 40k ticks".into(),
        }),
    }

    // a second wave reinforces the new colony
    let sent = sim.send_settlers(target, 1);
    let mut reinforced = false;
    if sent {
        for _ in 0..40_000 {
            sim.update(0.1);
            if sim.ship_count() == 0 {
                reinforced = sim.islands[target as usize].people_count >= 2;
                break;
            }
        }
    }
    results.push(TestResult {
        name: "logistics_reinforcements".into(),
        passed: sent && reinforced,
        detail: format!(
            "colony holds {} settlers",
            sim.islands[target as usize].people_count
        ),
    });

    results.push(TestResult {
        name: "logistics_rejects_unknown_target".into(),
        passed: !sim.send_settlers(9999, 1),
        detail: "unknown island refuses settlers".into(),
    });

    if verbose {
        println!("  Island populations after the run:");
        for island in &sim.islands {
            println!(
                "    #{:2} {} {:4} people (cap {})",
                island.index,
                if island.colonized { "colony" } else { "wild  " },
                island.people_count,
                island.people_max
            );
        }
    }

    results
}

// ── 6. Session Persistence ──────────────────────────────────────────────

fn validate_persistence(_verbose: bool) -> Vec<TestResult> {
    println!("--- Save & Load ---");
    let mut results = Vec::new();

    let Some((config, built)) = find_world(1) else {
        results.push(TestResult {
            name: "persistence_fixture".into(),
            passed: false,
            detail: "no island world within 40 seeds".into(),
        });
        return results;
    };
    let mut sim = Simulation::from_built(config, built);
    for _ in 0..50 {
        sim.update(0.1);
    }

    let path = std::env::temp_dir().join("skerry-simtest.save");
    let saved = std::fs::File::create(&path)
        .map_err(SaveError::from)
        .and_then(|file| sim.save(file));
    if let Err(e) = saved {
        results.push(TestResult {
            name: "persistence_save".into(),
            passed: false,
            detail: format!("save failed: {}", e),
        });
        return results;
    }
    results.push(TestResult {
        name: "persistence_save".into(),
        passed: true,
        detail: format!("session written to {}", path.display()),
    });

    let mut restored = Simulation::new(WorldConfig::default());
    let loaded = std::fs::File::open(&path)
        .map_err(SaveError::from)
        .and_then(|file| restored.load(file));
    let _ = std::fs::remove_file(&path);
    if let Err(e) = loaded {
        results.push(TestResult {
            name: "persistence_load".into(),
            passed: false,
            detail: format!("load failed: {}", e),
        });
        return results;
    }

    results.push(TestResult {
        name: "persistence_roundtrip".into(),
        passed: restored.islands == sim.islands
            && restored.totals == sim.totals
            && (restored.sim_time - sim.sim_time).abs() < f64::EPSILON
            && restored.colonist_count() == sim.colonist_count()
            && restored.ship_count() == sim.ship_count(),
        detail: format!(
            "{} islands, {} colonists restored",
            restored.islands.len(),
            restored.colonist_count()
        ),
    });

    // derived state is rebuilt from config, not decoded
    results.push(TestResult {
        name: "persistence_grid_rebuilt".into(),
        passed: restored.grid.as_ref().map(|g| g.land_cell_count())
            == sim.grid.as_ref().map(|g| g.land_cell_count())
            && restored.routes.len() == sim.routes.len(),
        detail: "raster and route trees rebuilt from config".into(),
    });

    let mut rejected = Simulation::new(WorldConfig::default());
    results.push(TestResult {
        name: "persistence_rejects_garbage".into(),
        passed: rejected.load(&[0x13u8, 0x37, 0x00][..]).is_err(),
        detail: "malformed stream returns an error".into(),
    });

    results
}
