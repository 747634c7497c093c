//! Connected-component labeling of land cells.
//!
//! Single row-major sweep assigning provisional labels, with a disjoint-set
//! recording label equivalences; a second sweep resolves every cell to its
//! canonical component and accumulates per-component cell counts and
//! bounding boxes. Connectivity is 4-way: diagonal land does not join.

use std::collections::HashMap;

use crate::grid::WorldGrid;

/// Disjoint-set over label indices, with path compression and union by rank
#[derive(Debug, Default)]
pub struct DisjointSet {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new singleton set, returning its label
    pub fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        self.rank.push(0);
        label
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Canonical representative of `label`'s set
    pub fn find(&mut self, label: u32) -> u32 {
        let mut root = label;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Path compression: repoint the chain at the root
        let mut cur = label;
        while self.parent[cur as usize] != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`, returning the surviving root
    pub fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return ra;
        }
        let (ra, rb) = (ra as usize, rb as usize);
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb as u32;
            rb as u32
        } else {
            self.parent[rb] = ra as u32;
            if self.rank[ra] == self.rank[rb] {
                self.rank[ra] += 1;
            }
            ra as u32
        }
    }
}

/// Cell count and bounding box of one component, in cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentStats {
    pub cells: u32,
    pub min_col: usize,
    pub min_row: usize,
    pub max_col: usize,
    pub max_row: usize,
}

impl ComponentStats {
    fn seed(col: usize, row: usize) -> Self {
        Self {
            cells: 0,
            min_col: col,
            min_row: row,
            max_col: col,
            max_row: row,
        }
    }

    fn absorb(&mut self, col: usize, row: usize) {
        self.cells += 1;
        self.min_col = self.min_col.min(col);
        self.min_row = self.min_row.min(row);
        self.max_col = self.max_col.max(col);
        self.max_row = self.max_row.max(row);
    }
}

/// Per-cell component ids plus per-component stats. Component ids are dense
/// and ordered by first appearance in the row-major sweep.
#[derive(Debug)]
pub struct Labeled {
    pub labels: Vec<Option<u32>>,
    pub components: Vec<ComponentStats>,
}

/// Label the grid's 4-connected land components.
pub fn label_components(grid: &WorldGrid) -> Labeled {
    let mut sets = DisjointSet::new();
    let mut provisional: Vec<Option<u32>> = vec![None; grid.cell_count()];

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            if !grid.is_land(col, row) {
                continue;
            }
            let left = if col > 0 {
                provisional[grid.index(col - 1, row)]
            } else {
                None
            };
            let up = if row > 0 {
                provisional[grid.index(col, row - 1)]
            } else {
                None
            };
            let label = match (left, up) {
                (None, None) => sets.make_set(),
                (Some(l), None) => l,
                (None, Some(u)) => u,
                (Some(l), Some(u)) => {
                    if l != u {
                        sets.union(l, u);
                    }
                    l.min(u)
                }
            };
            provisional[grid.index(col, row)] = Some(label);
        }
    }

    // Resolve provisional labels to canonical roots, compact the roots to
    // dense ids, and gather stats in the same sweep
    let mut compact: HashMap<u32, u32> = HashMap::new();
    let mut components: Vec<ComponentStats> = Vec::new();
    let mut labels: Vec<Option<u32>> = vec![None; grid.cell_count()];

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let idx = grid.index(col, row);
            let Some(label) = provisional[idx] else {
                continue;
            };
            let root = sets.find(label);
            let id = *compact.entry(root).or_insert_with(|| {
                components.push(ComponentStats::seed(col, row));
                (components.len() - 1) as u32
            });
            components[id as usize].absorb(col, row);
            labels[idx] = Some(id);
        }
    }

    Labeled { labels, components }
}
