//! Ship transit: waypoint following and arrival collection.

use hecs::{Entity, World};

use crate::components::{Position, Ship, SHIP_SPEED};

/// Cargo manifest of a ship that finished its route this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arrival {
    pub entity: Entity,
    pub source: u32,
    pub target: u32,
    pub people: u32,
}

/// Advance every ship along its path. Returns the ships that reached their
/// final waypoint this tick; the session delivers the cargo and despawns
/// them. A ship already flagged `reached` is left alone, so an arrival is
/// reported exactly once.
pub fn ship_transit_system(world: &mut World, dt: f32) -> Vec<Arrival> {
    let mut arrivals = Vec::new();
    for (entity, (position, ship)) in world.query_mut::<(&mut Position, &mut Ship)>() {
        if ship.reached {
            continue;
        }
        advance_ship(position, ship, dt);
        if ship.reached {
            arrivals.push(Arrival {
                entity,
                source: ship.source,
                target: ship.target,
                people: ship.people,
            });
        }
    }
    arrivals
}

/// One movement step. The ship keeps sailing while the step brings it closer
/// to the current waypoint; a step that would not is spent re-aiming at the
/// next waypoint instead, which absorbs overshoot at any tick rate.
fn advance_ship(position: &mut Position, ship: &mut Ship, dt: f32) {
    if ship.next_waypoint >= ship.path.len() {
        ship.reached = true;
        return;
    }
    let waypoint = ship.path[ship.next_waypoint];
    let next = position.0 + ship.heading * SHIP_SPEED * dt;
    if position.0.distance_squared(&waypoint) > next.distance_squared(&waypoint) {
        position.0 = next;
    } else {
        ship.next_waypoint += 1;
        match ship.path.get(ship.next_waypoint) {
            Some(next_wp) => ship.heading = (*next_wp - position.0).normalize(),
            None => ship.reached = true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;

    fn spawn_ship(world: &mut World, launch: Vec2, path: Vec<Vec2>) -> Entity {
        let ship = Ship::new(0, 1, 3, launch, path);
        world.spawn((Position(launch), ship))
    }

    #[test]
    fn test_ship_sails_toward_waypoint() {
        let mut world = World::new();
        let entity = spawn_ship(&mut world, Vec2::ZERO, vec![Vec2::new(10.0, 0.0)]);

        let arrivals = ship_transit_system(&mut world, 0.1);
        assert!(arrivals.is_empty());

        let position = world.get::<&Position>(entity).unwrap();
        assert!((position.0.x - 2.5).abs() < 1e-4);
        assert!(position.0.y.abs() < 1e-4);
    }

    #[test]
    fn test_ship_arrives_once() {
        let mut world = World::new();
        let target = Vec2::new(10.0, 0.0);
        let entity = spawn_ship(&mut world, Vec2::ZERO, vec![target]);

        let mut arrivals = Vec::new();
        for _ in 0..100 {
            arrivals.extend(ship_transit_system(&mut world, 0.1));
        }

        assert_eq!(arrivals.len(), 1);
        let arrival = arrivals[0];
        assert_eq!(arrival.entity, entity);
        assert_eq!(arrival.source, 0);
        assert_eq!(arrival.target, 1);
        assert_eq!(arrival.people, 3);

        let position = world.get::<&Position>(entity).unwrap();
        assert!(position.0.distance(&target) <= SHIP_SPEED * 0.1 + 1e-4);
        assert!(world.get::<&Ship>(entity).unwrap().reached);
    }

    #[test]
    fn test_ship_follows_multi_leg_route() {
        let mut world = World::new();
        let path = vec![Vec2::new(5.0, 0.0), Vec2::new(5.0, 5.0)];
        let entity = spawn_ship(&mut world, Vec2::ZERO, path);

        let mut arrivals = Vec::new();
        for _ in 0..200 {
            arrivals.extend(ship_transit_system(&mut world, 0.05));
        }

        assert_eq!(arrivals.len(), 1);
        let position = world.get::<&Position>(entity).unwrap();
        assert!(position.0.distance(&Vec2::new(5.0, 5.0)) <= SHIP_SPEED * 0.05 + 1e-4);
    }

    #[test]
    fn test_dense_waypoints_absorb_overshoot() {
        let mut world = World::new();
        // Waypoints far closer together than one step at this tick rate
        let path: Vec<Vec2> = (1..=20).map(|i| Vec2::new(i as f32 * 0.1, 0.0)).collect();
        spawn_ship(&mut world, Vec2::ZERO, path);

        let mut arrivals = Vec::new();
        for _ in 0..50 {
            arrivals.extend(ship_transit_system(&mut world, 0.1));
        }
        assert_eq!(arrivals.len(), 1);
    }
}
