//! Rasterized land/water grid.
//!
//! The grid is derived data: cells are noise samples taken at `step` spacing
//! across the map extent, centered on the origin. Route trees, island
//! labeling, and ship launches all work in grid cells; anything continuous
//! (wandering colonists, the on-demand point search) samples the noise field
//! directly.

use crate::components::{Rect, Vec2};
use crate::noise::NoiseField;

/// Land/water raster over the map extent
#[derive(Debug, Clone)]
pub struct WorldGrid {
    cols: usize,
    rows: usize,
    step: f32,
    half_extent: Vec2,
    land: Vec<bool>,
}

impl WorldGrid {
    /// Sample the noise field across `extent` at `step` spacing.
    ///
    /// `on_progress` is fed the completed fraction of the raster sweep.
    pub fn rasterize(
        noise: &NoiseField,
        extent: Vec2,
        step: f32,
        land_level: f32,
        mut on_progress: impl FnMut(f32),
    ) -> Self {
        let cols = (extent.x / step).ceil() as usize + 1;
        let rows = (extent.y / step).ceil() as usize + 1;
        let half_extent = extent * 0.5;

        let mut land = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let center = Vec2::new(
                    col as f32 * step - half_extent.x,
                    row as f32 * step - half_extent.y,
                );
                land.push(noise.is_land(center, land_level));
            }
            on_progress((row + 1) as f32 / rows as f32);
        }

        Self {
            cols,
            rows,
            step,
            half_extent,
            land,
        }
    }

    /// Build a grid from an explicit mask, row-major. The extent is implied
    /// by the mask dimensions.
    pub fn from_mask(cols: usize, rows: usize, step: f32, land: Vec<bool>) -> Self {
        assert_eq!(land.len(), cols * rows);
        let half_extent = Vec2::new(
            (cols.saturating_sub(1)) as f32 * step * 0.5,
            (rows.saturating_sub(1)) as f32 * step * 0.5,
        );
        Self {
            cols,
            rows,
            step,
            half_extent,
            land,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn land_cell_count(&self) -> usize {
        self.land.iter().filter(|&&l| l).count()
    }

    /// Map bounds in world units
    pub fn bounds(&self) -> Rect {
        Rect::new(self.half_extent * -1.0, self.half_extent)
    }

    /// Flattened row-major cell index
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    pub fn is_land(&self, col: usize, row: usize) -> bool {
        self.land[self.index(col, row)]
    }

    pub fn is_land_cell(&self, cell: usize) -> bool {
        self.land[cell]
    }

    /// World position of a cell center
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        Vec2::new(
            col as f32 * self.step - self.half_extent.x,
            row as f32 * self.step - self.half_extent.y,
        )
    }

    /// World position of a flattened cell index's center
    pub fn cell_index_center(&self, cell: usize) -> Vec2 {
        self.cell_center(cell % self.cols, cell / self.cols)
    }

    /// Nearest cell to a world position, or None if outside the raster
    pub fn cell_at(&self, p: Vec2) -> Option<(usize, usize)> {
        let col = ((p.x + self.half_extent.x) / self.step).round();
        let row = ((p.y + self.half_extent.y) / self.step).round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((col, row))
    }

    /// Whether the cell nearest a world position is land; positions outside
    /// the raster count as water
    pub fn is_land_at(&self, p: Vec2) -> bool {
        self.cell_at(p)
            .map(|(col, row)| self.is_land(col, row))
            .unwrap_or(false)
    }
}
