//! Deterministic gradient-noise height field.
//!
//! Heights come from three octaves of integer-lattice gradient noise with
//! hashed corner gradients. The hash is the only source of randomness, so a
//! given (seed, scale, offset, position) produces the same height on every
//! call, every run, every platform - world generation, pathfinding, and agent
//! land checks all rely on that.

use serde::{Deserialize, Serialize};

use crate::components::Vec2;

/// Keeps lattice coordinates positive before truncation to cell indices
const LATTICE_OFFSET: f32 = 100_000.0;
/// Mixed into the corner hash so seed 0 still yields a varied field
const SEED_SALT: i32 = 1000;

/// Octave (weight, frequency) pairs; weights normalize by their sum below
const OCTAVES: [(f32, f32); 3] = [(0.3, 1.0), (2.0, 0.1), (3.5, 0.05)];
const OCTAVE_NORM: f32 = 4.2;

/// Parameters identifying a height field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NoiseParams {
    pub seed: i32,
    /// Query-space scale applied to sample positions
    pub scale: f32,
    /// Query-space translation applied to sample positions
    pub offset: Vec2,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

/// A sampleable height field
#[derive(Debug, Clone, Copy)]
pub struct NoiseField {
    params: NoiseParams,
}

impl NoiseField {
    pub fn new(params: NoiseParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> NoiseParams {
        self.params
    }

    /// Terrain height at a world position, roughly within [-1, 1]
    pub fn height(&self, p: Vec2) -> f32 {
        let q = self.params.offset + p * self.params.scale;
        let mut sum = 0.0;
        for (weight, frequency) in OCTAVES {
            sum += weight * self.octave(q * frequency);
        }
        sum / OCTAVE_NORM
    }

    /// Whether a position is at or above the land threshold
    pub fn is_land(&self, p: Vec2, land_level: f32) -> bool {
        self.height(p) >= land_level
    }

    /// Single octave of gradient noise over the unit lattice
    fn octave(&self, p: Vec2) -> f32 {
        let ix = p.x.floor();
        let iy = p.y.floor();
        let fx = p.x - ix;
        let fy = p.y - iy;

        let n00 = self.gradient(ix, iy).dot(&Vec2::new(fx, fy));
        let n10 = self.gradient(ix + 1.0, iy).dot(&Vec2::new(fx - 1.0, fy));
        let n01 = self.gradient(ix, iy + 1.0).dot(&Vec2::new(fx, fy - 1.0));
        let n11 = self
            .gradient(ix + 1.0, iy + 1.0)
            .dot(&Vec2::new(fx - 1.0, fy - 1.0));

        let u = fade(fx);
        let v = fade(fy);

        lerp(lerp(n00, n10, u), lerp(n01, n11, u), v)
    }

    /// Pseudo-random unit gradient at a lattice corner
    fn gradient(&self, x: f32, y: f32) -> Vec2 {
        let angle = self.corner_hash(x, y) * std::f32::consts::TAU;
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Hash a lattice corner to [0, 1)
    fn corner_hash(&self, x: f32, y: f32) -> f32 {
        let ix = ((x + LATTICE_OFFSET).floor() as u32) & 0xFFFF;
        let iy = ((y + LATTICE_OFFSET).floor() as u32) & 0xFFFF;
        let s = self.params.seed.wrapping_add(SEED_SALT) as u32;

        let mut n = ix
            .wrapping_mul(73_856_093)
            .wrapping_add(iy.wrapping_mul(19_349_669))
            .wrapping_add(s.wrapping_mul(83_492_791));

        n = ((n >> 16) ^ n).wrapping_mul(0x45d9_f3b);
        n = ((n >> 16) ^ n).wrapping_mul(0x45d9_f3b);
        n = (n >> 16) ^ n;

        n as f32 * (1.0 / 4_294_967_296.0)
    }
}

fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
