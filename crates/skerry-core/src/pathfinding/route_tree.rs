//! Per-island sea-route trees.
//!
//! Each island gets one shortest-path tree over the water cells, rooted at a
//! coastal cell on its origin-facing side. Ships bound for the island walk
//! the predecessor chain from wherever they launch, so route queries cost a
//! chain walk instead of a search. Trees are rebuilt whenever the island set
//! changes and after load; they are never persisted.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::Priority;
use crate::components::{Island, Vec2};
use crate::grid::WorldGrid;

const DIAGONAL_COST: f32 = std::f32::consts::SQRT_2;

/// Shortest-path predecessor tree over the water grid, toward one island
#[derive(Debug, Clone)]
pub struct RouteTree {
    island: u32,
    root: u32,
    parent: Vec<Option<u32>>,
    cost: Vec<f32>,
}

impl RouteTree {
    /// Build the island's route tree. Returns None when the grid holds no
    /// water at all.
    pub fn build(grid: &WorldGrid, island: &Island) -> Option<Self> {
        let root = launch_cell(grid, island)?;

        let cells = grid.cell_count();
        let mut cost = vec![f32::INFINITY; cells];
        let mut parent: Vec<Option<u32>> = vec![None; cells];
        let mut heap: BinaryHeap<(Reverse<Priority>, u32)> = BinaryHeap::new();

        cost[root as usize] = 0.0;
        heap.push((Reverse(Priority(0.0)), root));

        while let Some((Reverse(Priority(c)), cell)) = heap.pop() {
            if c > cost[cell as usize] {
                continue;
            }
            let col = cell as usize % grid.cols();
            let row = cell as usize / grid.cols();

            for dr in -1isize..=1 {
                for dc in -1isize..=1 {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    let ncol = col as isize + dc;
                    let nrow = row as isize + dr;
                    if ncol < 0
                        || nrow < 0
                        || ncol as usize >= grid.cols()
                        || nrow as usize >= grid.rows()
                    {
                        continue;
                    }
                    let (ncol, nrow) = (ncol as usize, nrow as usize);
                    if grid.is_land(ncol, nrow) {
                        continue;
                    }
                    let edge = if dr != 0 && dc != 0 { DIAGONAL_COST } else { 1.0 };
                    let next_cost = c + edge;
                    let nidx = grid.index(ncol, nrow);
                    if next_cost < cost[nidx] {
                        cost[nidx] = next_cost;
                        parent[nidx] = Some(cell);
                        heap.push((Reverse(Priority(next_cost)), nidx as u32));
                    }
                }
            }
        }

        Some(Self {
            island: island.index,
            root,
            parent,
            cost,
        })
    }

    pub fn island(&self) -> u32 {
        self.island
    }

    /// Flattened cell index of the coastal approach
    pub fn root(&self) -> u32 {
        self.root
    }

    /// Predecessor of a cell on the way to the root
    pub fn parent(&self, cell: u32) -> Option<u32> {
        self.parent.get(cell as usize).copied().flatten()
    }

    /// Cumulative route cost from the root, in grid steps
    pub fn cost(&self, cell: u32) -> f32 {
        self.cost.get(cell as usize).copied().unwrap_or(f32::INFINITY)
    }

    /// Whether the cell can reach the island along this tree
    pub fn has_route(&self, cell: u32) -> bool {
        cell == self.root || self.parent(cell).is_some()
    }

    /// Waypoints from a world position to the island's coastal approach.
    /// Empty when the position snaps outside the raster or has no route.
    pub fn path_from(&self, grid: &WorldGrid, start: Vec2) -> Vec<Vec2> {
        let Some((col, row)) = grid.cell_at(start) else {
            return Vec::new();
        };
        let mut cell = grid.index(col, row) as u32;
        if !self.has_route(cell) {
            return Vec::new();
        }

        let mut path = vec![grid.cell_index_center(cell as usize)];
        while let Some(next) = self.parent(cell) {
            cell = next;
            path.push(grid.cell_index_center(cell as usize));
        }
        path
    }
}

/// First water cell walking from the island's center toward the map origin;
/// islands slumped over the origin walk +x instead. Falls back to the water
/// cell nearest the center if the walk leaves the raster without finding sea.
fn launch_cell(grid: &WorldGrid, island: &Island) -> Option<u32> {
    let center = island.bounds.center();
    let toward_origin = Vec2::ZERO - center;
    let dir = if toward_origin.length() > f32::EPSILON {
        toward_origin.normalize()
    } else {
        Vec2::new(1.0, 0.0)
    };

    let mut p = center;
    for _ in 0..grid.cols() + grid.rows() {
        match grid.cell_at(p) {
            Some((col, row)) if !grid.is_land(col, row) => {
                return Some(grid.index(col, row) as u32);
            }
            Some(_) => {}
            None => break,
        }
        p = p + dir * grid.step();
    }

    nearest_water_cell(grid, center)
}

fn nearest_water_cell(grid: &WorldGrid, to: Vec2) -> Option<u32> {
    let mut best: Option<(f32, u32)> = None;
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if grid.is_land(col, row) {
                continue;
            }
            let d = grid.cell_center(col, row).distance_squared(&to);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, grid.index(col, row) as u32));
            }
        }
    }
    best.map(|(_, cell)| cell)
}
