//! Simulation session - main entry point for running a colony world.

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::components::*;
use crate::generation::{build_world, BuiltWorld, WorldConfig};
use crate::grid::WorldGrid;
use crate::noise::NoiseField;
use crate::pathfinding::{find_path, RouteTree};
use crate::persistence::{self, SaveError};
use crate::systems::*;

/// Attempts at finding a launch point with a sea route before a dispatch
/// gives up
const LAUNCH_ATTEMPTS: usize = 5;

/// A colony simulation session.
///
/// Owns the terrain (noise field, land raster, islands), the crown economy,
/// and the agent world. All randomness flows through one seeded generator, so
/// two sessions constructed from the same config replay identically.
pub struct Simulation {
    /// ECS world containing ships and colonists
    pub world: World,
    /// Islands by dense index
    pub islands: Vec<Island>,
    /// Crown stockpiles and the global settler head count
    pub totals: ResourceTotals,
    /// Rasterized land mask; None until a world is generated or loaded
    pub grid: Option<WorldGrid>,
    /// Sea route tree per island, indexed like `islands`
    pub routes: Vec<Option<RouteTree>>,
    /// Simulation time in seconds since start
    pub sim_time: f64,

    config: WorldConfig,
    noise: NoiseField,
    rng: ChaCha8Rng,
    last_growth: f64,
}

impl Simulation {
    /// Create an empty session; call [`generate`](Self::generate) to build
    /// the world.
    pub fn new(config: WorldConfig) -> Self {
        let noise = NoiseField::new(config.noise_params());
        let rng = ChaCha8Rng::seed_from_u64(config.seed as u64);
        Self {
            world: World::new(),
            islands: Vec::new(),
            totals: ResourceTotals::default(),
            grid: None,
            routes: Vec::new(),
            sim_time: 0.0,
            config,
            noise,
            rng,
            last_growth: 0.0,
        }
    }

    /// Generate the world in place: rasterize the noise field, extract
    /// islands, and seed the bootstrap colony.
    pub fn generate(&mut self) {
        let built = build_world(&self.noise, &self.config, None);
        self.install(built);
    }

    /// Wrap a world that was built elsewhere, typically on a worker thread
    /// via [`spawn_build`](crate::generation::spawn_build).
    pub fn from_built(config: WorldConfig, built: BuiltWorld) -> Self {
        let mut sim = Self::new(config);
        sim.install(built);
        sim
    }

    fn install(&mut self, built: BuiltWorld) {
        self.islands = built.islands;
        self.totals = built.totals;
        self.grid = Some(built.grid);
        self.rebuild_routes();

        self.world = World::new();
        self.sim_time = 0.0;
        self.last_growth = 0.0;
        let spawns = self.colony_spawns();
        for (island, position) in spawns {
            let colonist = Colonist::new(island, &mut self.rng);
            self.world.spawn((Position(position), colonist));
        }
    }

    /// One colonist per resident of every colonized island
    fn colony_spawns(&mut self) -> Vec<(u32, Vec2)> {
        let land_level = self.config.land_level();
        let mut spawns = Vec::new();
        for island in self.islands.iter().filter(|i| i.colonized) {
            for _ in 0..island.people_count {
                let p = island.random_land_point(&self.noise, land_level, &mut self.rng);
                spawns.push((island.index, p));
            }
        }
        spawns
    }

    fn rebuild_routes(&mut self) {
        self.routes = match &self.grid {
            Some(grid) => self
                .islands
                .iter()
                .map(|island| RouteTree::build(grid, island))
                .collect(),
            None => Vec::new(),
        };
    }

    /// Advance the session by `dt` seconds: sail ships, deliver arrivals,
    /// wander colonists, and fire a growth tick once per growth period.
    pub fn update(&mut self, dt: f32) {
        self.sim_time += f64::from(dt);

        let arrivals = ship_transit_system(&mut self.world, dt);
        for arrival in arrivals {
            self.deliver(arrival);
        }

        if let Some(grid) = &self.grid {
            wander_system(
                &mut self.world,
                &self.noise,
                grid.bounds(),
                self.config.land_level(),
                &mut self.rng,
                dt,
            );
        }

        if self.sim_time - self.last_growth > self.config.growth_period {
            self.run_growth();
            self.last_growth = self.sim_time;
        }
    }

    /// Run the growth tick on every island and spawn the settlers born.
    fn run_growth(&mut self) {
        let land_level = self.config.land_level();
        let mut spawns = Vec::new();
        for island in &mut self.islands {
            let born = growth_tick(island, &mut self.totals, &mut self.rng);
            for _ in 0..born {
                let p = island.random_land_point(&self.noise, land_level, &mut self.rng);
                spawns.push((island.index, p));
            }
        }
        for (island, position) in spawns {
            let colonist = Colonist::new(island, &mut self.rng);
            self.world.spawn((Position(position), colonist));
        }
    }

    /// Land an arriving ship's settlers on the target island. Settlers beyond
    /// the island's capacity are lost at the dock.
    fn deliver(&mut self, arrival: Arrival) {
        let _ = self.world.despawn(arrival.entity);
        let island = match self.islands.get_mut(arrival.target as usize) {
            Some(island) => island,
            None => return,
        };

        let room = island.people_max.saturating_sub(island.people_count);
        let landed = arrival.people.min(room);
        let lost = arrival.people - landed;
        island.people_count += landed;

        let land_level = self.config.land_level();
        let mut spawns = Vec::with_capacity(landed as usize);
        for _ in 0..landed {
            spawns.push(island.random_land_point(&self.noise, land_level, &mut self.rng));
        }
        for position in spawns {
            let colonist = Colonist::new(arrival.target, &mut self.rng);
            self.world.spawn((Position(position), colonist));
        }

        if lost > 0 {
            self.totals.people = self.totals.people.saturating_sub(u64::from(lost));
            warn!(island = arrival.target, lost, "arrivals beyond capacity were lost");
        }
        debug!(island = arrival.target, landed, "settlers landed");
    }

    /// Found a colony on an uncolonized island by shipping one settler from
    /// the most populous existing colony. The colonization price is deducted
    /// only once a ship is actually underway; any failure leaves the session
    /// untouched and returns false.
    pub fn colonize(&mut self, target: u32) -> bool {
        let (wood_price, iron_price) = match self.islands.get(target as usize) {
            Some(island) if !island.colonized => (island.wood_colonize, island.iron_colonize),
            _ => return false,
        };
        if i64::from(wood_price) > self.totals.wood || i64::from(iron_price) > self.totals.iron {
            return false;
        }
        let source = match self.pick_source(target) {
            Some(source) => source,
            None => return false,
        };
        if !self.dispatch(source, target, 1) {
            return false;
        }

        self.totals.wood -= i64::from(wood_price);
        self.totals.iron -= i64::from(iron_price);
        let island = &mut self.islands[target as usize];
        island.colonized = true;
        island.people_max = island.people_max.max(3);
        info!(
            island = target,
            wood = wood_price,
            iron = iron_price,
            "colonization underway"
        );
        true
    }

    /// Reinforce an existing colony with `count` settlers from the most
    /// populous other colony. Returns false if no source can spare them or no
    /// sea route exists.
    pub fn send_settlers(&mut self, target: u32, count: u32) -> bool {
        match self.islands.get(target as usize) {
            Some(island) if island.colonized => {}
            _ => return false,
        }
        let source = match self.pick_source(target) {
            Some(source) => source,
            None => return false,
        };
        self.dispatch(source, target, count)
    }

    /// Run one growth tick on a single island, out of band of the growth
    /// period. Returns the settlers born.
    pub fn tick_growth(&mut self, island: u32) -> u32 {
        let land_level = self.config.land_level();
        let island = match self.islands.get_mut(island as usize) {
            Some(island) => island,
            None => return 0,
        };
        let born = growth_tick(island, &mut self.totals, &mut self.rng);
        let index = island.index;
        let mut spawns = Vec::with_capacity(born as usize);
        for _ in 0..born {
            spawns.push(island.random_land_point(&self.noise, land_level, &mut self.rng));
        }
        for position in spawns {
            let colonist = Colonist::new(index, &mut self.rng);
            self.world.spawn((Position(position), colonist));
        }
        born
    }

    /// Set an island's tax level, clamped to 0-100.
    pub fn set_taxes(&mut self, island: u32, taxes: i32) -> bool {
        match self.islands.get_mut(island as usize) {
            Some(island) => {
                island.taxes = taxes.clamp(0, 100);
                true
            }
            None => false,
        }
    }

    /// Most populous colonized island other than `target` with anyone to
    /// spare
    fn pick_source(&self, target: u32) -> Option<u32> {
        self.islands
            .iter()
            .filter(|i| i.index != target && i.colonized && i.people_count >= 1)
            .max_by_key(|i| i.people_count)
            .map(|i| i.index)
    }

    /// Board `people` settlers from `source` onto a new ship bound for
    /// `target`. Resolves a launch point and a sea route first; nothing is
    /// deducted unless a ship actually sails.
    fn dispatch(&mut self, source: u32, target: u32, people: u32) -> bool {
        if people == 0 || self.islands[source as usize].people_count < people {
            return false;
        }
        let grid = match &self.grid {
            Some(grid) => grid,
            None => return false,
        };
        let tree = match self.routes.get(target as usize).and_then(|r| r.as_ref()) {
            Some(tree) => tree,
            None => return false,
        };

        let source_island = &self.islands[source as usize];
        let aim = self.islands[target as usize].bounds.center();
        let land_level = self.config.land_level();

        let mut launch = Vec2::ZERO;
        let mut path = Vec::new();
        for _ in 0..LAUNCH_ATTEMPTS {
            let start = match launch_point(grid, source_island, aim, &mut self.rng) {
                Some(start) => start,
                None => continue,
            };
            let mut candidate = tree.path_from(grid, start);
            if candidate.is_empty() {
                // Launch point sits in a sea pocket the route tree never
                // reached; search for a way out directly
                let goal = grid.cell_index_center(tree.root() as usize);
                candidate = find_path(
                    &self.noise,
                    grid.bounds(),
                    land_level,
                    start,
                    goal,
                    false,
                    grid.step(),
                );
            }
            if !candidate.is_empty() {
                launch = start;
                path = candidate;
                break;
            }
        }
        if path.is_empty() {
            debug!(source, target, "no sea route for dispatch");
            return false;
        }

        self.islands[source as usize].people_count -= people;
        let boarded: Vec<Entity> = self
            .world
            .query::<&Colonist>()
            .iter()
            .filter(|(_, c)| c.island == source)
            .take(people as usize)
            .map(|(entity, _)| entity)
            .collect();
        for entity in boarded {
            let _ = self.world.despawn(entity);
        }

        let ship = Ship::new(source, target, people, launch, path);
        self.world.spawn((Position(launch), ship));
        debug!(source, target, people, "ship underway");
        true
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn island(&self, index: u32) -> Option<&Island> {
        self.islands.get(index as usize)
    }

    pub fn route(&self, index: u32) -> Option<&RouteTree> {
        self.routes.get(index as usize).and_then(|r| r.as_ref())
    }

    /// Count colonists on land
    pub fn colonist_count(&self) -> usize {
        self.world.query::<&Colonist>().iter().count()
    }

    /// Count ships in transit
    pub fn ship_count(&self) -> usize {
        self.world.query::<&Ship>().iter().count()
    }

    /// Save session state to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_session(
            writer,
            &self.config,
            self.sim_time,
            self.grid.is_some(),
            &self.islands,
            &self.totals,
            &self.world,
        )
    }

    /// Load session state from a reader, replacing this session's world.
    /// The land raster and route trees are derived data and are rebuilt from
    /// the loaded config rather than stored.
    pub fn load<R: std::io::Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = persistence::load_session(reader)?;

        self.config = loaded.config;
        self.noise = NoiseField::new(self.config.noise_params());
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed as u64);
        self.sim_time = loaded.sim_time;
        self.islands = loaded.islands;
        self.totals = loaded.totals;
        self.world = loaded.world;

        self.grid = if loaded.world_built {
            Some(WorldGrid::rasterize(
                &self.noise,
                self.config.extent,
                self.config.step,
                self.config.land_level(),
                |_| {},
            ))
        } else {
            None
        };
        self.rebuild_routes();
        self.last_growth = self.sim_time;

        info!(
            islands = self.islands.len(),
            sim_time = self.sim_time,
            "session loaded"
        );
        Ok(())
    }
}

/// Random land position on the source island walked off-shore toward the
/// target, by grid cells. None if the walk leaves the map or never reaches
/// water.
fn launch_point(
    grid: &WorldGrid,
    island: &Island,
    toward: Vec2,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let start = random_land_cell(grid, island, rng)?;
    let dir = (toward - start).normalize();
    if dir == Vec2::ZERO {
        return None;
    }

    let mut p = start;
    for _ in 0..grid.cols() + grid.rows() {
        p = p + dir * grid.step();
        if !grid.bounds().contains(&p) {
            return None;
        }
        if !grid.is_land_at(p) {
            return Some(p);
        }
    }
    None
}

/// Random position within the island bounds whose grid cell is land.
/// Rejection-samples first, then falls back to scanning the bounds.
fn random_land_cell(grid: &WorldGrid, island: &Island, rng: &mut impl Rng) -> Option<Vec2> {
    for _ in 0..32 {
        let p = Vec2::new(
            rng.gen_range(island.bounds.min.x..=island.bounds.max.x),
            rng.gen_range(island.bounds.min.y..=island.bounds.max.y),
        );
        if grid.is_land_at(p) {
            return Some(p);
        }
    }

    let (min_col, min_row) = grid.cell_at(island.bounds.min)?;
    let (max_col, max_row) = grid.cell_at(island.bounds.max)?;
    for row in min_row..=max_row {
        for col in min_col..=max_col {
            if grid.is_land(col, row) {
                return Some(grid.cell_center(col, row));
            }
        }
    }
    None
}
