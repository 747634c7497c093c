//! On-demand point-to-point search over the raw height field.
//!
//! Unlike the per-island route trees, which are built once against the
//! rasterized grid, this search samples the noise field directly on a step
//! lattice anchored at the start point. Agents use it for short hops where
//! no precomputed tree applies.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::components::{Rect, Vec2};
use crate::noise::NoiseField;

use super::Priority;

/// Weight on height change when costing a move; steep hops get expensive fast
const SLOPE_WEIGHT: f32 = 10.0;

/// A* from `start` toward `goal`, restricted to positions whose land check
/// matches `want_land` and which lie inside `bounds`.
///
/// Candidate positions form a lattice of `step`-sized moves anchored at
/// `start`. The search arrives once it pops a node within half a step of the
/// goal. The returned waypoints run from the first move to the arrival node;
/// the start position itself is not included. An empty path means the goal
/// was unreachable (or the start already lies within arrival range).
pub fn find_path(
    noise: &NoiseField,
    bounds: Rect,
    land_level: f32,
    start: Vec2,
    goal: Vec2,
    want_land: bool,
    step: f32,
) -> Vec<Vec2> {
    let arrive_sq = step * step * 0.5;
    let point = |key: (i32, i32)| -> Vec2 {
        Vec2::new(start.x + key.0 as f32 * step, start.y + key.1 as f32 * step)
    };

    let mut frontier: BinaryHeap<(Reverse<Priority>, (i32, i32))> = BinaryHeap::new();
    let mut came_from: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
    let mut cost: HashMap<(i32, i32), f32> = HashMap::new();

    frontier.push((Reverse(Priority(0.0)), (0, 0)));
    cost.insert((0, 0), 0.0);

    let mut arrival = None;
    while let Some((_, current)) = frontier.pop() {
        let current_p = point(current);
        if current_p.distance_squared(&goal) < arrive_sq {
            arrival = Some(current);
            break;
        }

        let current_cost = cost.get(&current).copied().unwrap_or(f32::INFINITY);
        let current_h = noise.height(current_p);

        for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let next = (current.0 + dx, current.1 + dy);
            let next_p = point(next);
            if !bounds.contains(&next_p) || noise.is_land(next_p, land_level) != want_land {
                continue;
            }

            let diff = noise.height(next_p) - current_h;
            let next_cost = current_cost + 1.0 + (diff * SLOPE_WEIGHT).powi(2);
            if next_cost < cost.get(&next).copied().unwrap_or(f32::INFINITY) {
                cost.insert(next, next_cost);
                came_from.insert(next, current);
                let heuristic = (goal.x - next_p.x).abs() + (goal.y - next_p.y).abs();
                frontier.push((Reverse(Priority(next_cost + heuristic)), next));
            }
        }
    }

    let mut node = match arrival {
        Some(node) => node,
        None => return Vec::new(),
    };

    // The start node has no predecessor, so it drops out here
    let mut path = Vec::new();
    while let Some(&prev) = came_from.get(&node) {
        path.push(point(node));
        node = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseParams;

    fn field(seed: i32) -> NoiseField {
        NoiseField::new(NoiseParams {
            seed,
            ..Default::default()
        })
    }

    #[test]
    fn test_already_within_arrival_range() {
        let noise = field(11);
        let bounds = Rect::centered(Vec2::new(50.0, 50.0));
        let start = Vec2::new(3.0, 4.0);
        let goal = Vec2::new(3.5, 4.0);
        let want_land = noise.is_land(start, 0.1);
        let path = find_path(&noise, bounds, 0.1, start, goal, want_land, 1.0);
        assert!(path.is_empty());
    }

    #[test]
    fn test_bounds_too_tight_to_move() {
        let noise = field(11);
        // No neighbor of the start fits inside the bounds, so the frontier
        // drains without arriving
        let bounds = Rect::new(Vec2::new(-0.25, -0.25), Vec2::new(0.25, 0.25));
        let path = find_path(
            &noise,
            bounds,
            0.1,
            Vec2::ZERO,
            Vec2::new(20.0, 0.0),
            true,
            1.0,
        );
        assert!(path.is_empty());
    }

    #[test]
    fn test_path_honors_terrain_class() {
        let noise = field(1234);
        let land_level = 0.1;
        let bounds = Rect::centered(Vec2::new(100.0, 100.0));
        let step = 1.0;

        // Scan for a straight run of six same-class cells so a corridor is
        // guaranteed to exist
        let mut found = None;
        'scan: for row in -20..20 {
            for col in -20..15 {
                let kind = noise.is_land(Vec2::new(col as f32, row as f32), land_level);
                let run = (0..6).all(|i| {
                    noise.is_land(Vec2::new((col + i) as f32, row as f32), land_level) == kind
                });
                if run {
                    found = Some((col as f32, row as f32, kind));
                    break 'scan;
                }
            }
        }
        let (x, y, want_land) = found.expect("no straight run in the sample window");

        let start = Vec2::new(x, y);
        let goal = Vec2::new(x + 5.0, y);
        let path = find_path(&noise, bounds, land_level, start, goal, want_land, step);

        assert!(!path.is_empty());
        let end = path.last().unwrap();
        assert!(end.distance_squared(&goal) < step * step * 0.5);

        // Each hop is one axis-aligned step and every waypoint stays on the
        // requested terrain class
        let mut prev = start;
        for p in &path {
            assert_eq!(noise.is_land(*p, land_level), want_land);
            let hop = prev.distance(p);
            assert!((hop - step).abs() < 1e-3, "hop of length {}", hop);
            prev = *p;
        }
    }
}
