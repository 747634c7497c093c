//! Save/load for session state.
//!
//! The save is a bincode snapshot of the durable state: config, clock,
//! islands, crown totals, and the agent entities. The land raster and route
//! trees are derived from the config and rebuilt on load instead of stored,
//! which keeps saves small and immune to raster format drift.

use std::io::{Read, Write};

use hecs::World;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{Colonist, Island, Position, Ship};
use crate::generation::WorldConfig;
use crate::systems::ResourceTotals;

/// Save format version (increment when the format changes)
const SAVE_VERSION: u32 = 1;

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Serializable snapshot of a session
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    config: WorldConfig,
    sim_time: f64,
    /// Whether the session had a generated world; decides the raster rebuild
    world_built: bool,
    islands: Vec<Island>,
    totals: ResourceTotals,
    colonists: Vec<ColonistRecord>,
    ships: Vec<ShipRecord>,
}

#[derive(Serialize, Deserialize)]
struct ColonistRecord {
    position: Position,
    colonist: Colonist,
}

#[derive(Serialize, Deserialize)]
struct ShipRecord {
    position: Position,
    ship: Ship,
}

/// Result of loading a session
pub struct LoadedSession {
    pub config: WorldConfig,
    pub sim_time: f64,
    pub world_built: bool,
    pub islands: Vec<Island>,
    pub totals: ResourceTotals,
    pub world: World,
}

/// Write a session snapshot to `writer`.
pub fn save_session<W: Write>(
    writer: W,
    config: &WorldConfig,
    sim_time: f64,
    world_built: bool,
    islands: &[Island],
    totals: &ResourceTotals,
    world: &World,
) -> Result<(), SaveError> {
    let mut colonists = Vec::new();
    for (_, (position, colonist)) in world.query::<(&Position, &Colonist)>().iter() {
        colonists.push(ColonistRecord {
            position: *position,
            colonist: *colonist,
        });
    }
    let mut ships = Vec::new();
    for (_, (position, ship)) in world.query::<(&Position, &Ship)>().iter() {
        ships.push(ShipRecord {
            position: *position,
            ship: ship.clone(),
        });
    }

    let save_data = SaveData {
        version: SAVE_VERSION,
        config: config.clone(),
        sim_time,
        world_built,
        islands: islands.to_vec(),
        totals: *totals,
        colonists,
        ships,
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Read a session snapshot back, respawning the agents into a fresh world.
pub fn load_session<R: Read>(reader: R) -> Result<LoadedSession, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;
    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    for record in save_data.colonists {
        world.spawn((record.position, record.colonist));
    }
    for record in save_data.ships {
        world.spawn((record.position, record.ship));
    }

    Ok(LoadedSession {
        config: save_data.config,
        sim_time: save_data.sim_time,
        world_built: save_data.world_built,
        islands: save_data.islands,
        totals: save_data.totals,
        world,
    })
}
