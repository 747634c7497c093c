//! Colonist idle-wander over home-island terrain.

use hecs::World;
use rand::Rng;

use crate::components::{Colonist, Position, Rect, Vec2, HEADING_RETRIES, SWAY_LIMIT_DEG};
use crate::noise::NoiseField;

/// Sway and step every colonist. A step happens only if it lands inside the
/// map and on land; otherwise the colonist re-rolls its heading a few times
/// and failing that stays put until the next tick.
pub fn wander_system(
    world: &mut World,
    noise: &NoiseField,
    map: Rect,
    land_level: f32,
    rng: &mut impl Rng,
    dt: f32,
) {
    for (_entity, (position, colonist)) in world.query_mut::<(&mut Position, &mut Colonist)>() {
        colonist.sway_deg += colonist.sway_dir * colonist.sway_speed * dt;
        if colonist.sway_deg < -SWAY_LIMIT_DEG {
            colonist.sway_dir = 1.0;
        }
        if colonist.sway_deg > SWAY_LIMIT_DEG {
            colonist.sway_dir = -1.0;
        }

        for _ in 0..HEADING_RETRIES {
            let dir = Vec2::from_angle_deg(colonist.heading_deg + colonist.sway_deg);
            let next = position.0 + dir * colonist.speed * dt;
            if map.contains(&next) && noise.is_land(next, land_level) {
                position.0 = next;
                break;
            }
            colonist.heading_deg = rng.gen_range(0.0..360.0);
        }
    }
}
