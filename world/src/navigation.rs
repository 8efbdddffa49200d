//! Static reachability graph over the cave floor.

use std::collections::VecDeque;

use beverage_bandits_core::{CellCoord, Occupant, OccupancyView};

use crate::layout::{Cell, Layout};

/// Undirected graph with one node per floor cell.
///
/// Edges join orthogonally adjacent floor cells and neighbour lists are kept in
/// reading order. The topology is fixed once built; unit occupancy only enters
/// through the transient blocking applied by [`NavMesh::flood`].
#[derive(Clone, Debug, Default)]
pub struct NavMesh {
    columns: u32,
    rows: u32,
    node_of: Vec<Option<usize>>,
    nodes: Vec<NavNode>,
}

#[derive(Clone, Debug)]
struct NavNode {
    cell: CellCoord,
    cell_index: usize,
    neighbors: Vec<usize>,
}

impl NavMesh {
    /// Builds the graph from the floor cells of the provided layout.
    #[must_use]
    pub fn from_layout(layout: &Layout) -> Self {
        let columns = layout.columns();
        let rows = layout.rows();
        let mut node_of = vec![None; layout.cells().len()];
        let mut nodes = Vec::new();

        for (cell_index, cell) in layout.cells().iter().enumerate() {
            if *cell != Cell::Floor {
                continue;
            }
            node_of[cell_index] = Some(nodes.len());
            nodes.push(NavNode {
                cell: cell_at(columns, cell_index),
                cell_index,
                neighbors: Vec::with_capacity(4),
            });
        }

        for node in &mut nodes {
            for neighbor in node.cell.cardinal_neighbors(columns, rows) {
                if let Some(slot) = index(columns, neighbor).and_then(|offset| node_of[offset]) {
                    node.neighbors.push(slot);
                }
            }
        }

        Self {
            columns,
            rows,
            node_of,
            nodes,
        }
    }

    /// Number of floor nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether the cell is a floor node.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.node(cell).is_some()
    }

    /// Floor cells adjacent to the provided cell, in reading order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        self.node(cell)
            .map(|node| self.nodes[node].neighbors.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&neighbor| self.nodes[neighbor].cell)
    }

    /// Fills `field` with breadth-first step counts from `root`.
    ///
    /// Cells holding a unit are impassable unless they are the root or listed
    /// in `exempt`. The field is fully reset first, so repeated calls with the
    /// same arguments yield identical results.
    pub fn flood(
        &self,
        root: CellCoord,
        occupancy: OccupancyView<'_>,
        exempt: &[CellCoord],
        field: &mut DistanceField,
    ) {
        field.reset(self.columns, self.rows, root);

        for node in &self.nodes {
            let occupied = matches!(occupancy.occupant(node.cell), Some(Occupant::Unit(_)));
            if occupied && node.cell != root && !exempt.contains(&node.cell) {
                field.blocked[node.cell_index] = true;
            }
        }

        let Some(root_node) = self.node(root) else {
            return;
        };
        field.costs[self.nodes[root_node].cell_index] = Some(0);
        field.frontier.push_back(root_node);

        while let Some(current) = field.frontier.pop_front() {
            let node = &self.nodes[current];
            let Some(cost) = field.costs[node.cell_index] else {
                continue;
            };
            let next_cost = cost.saturating_add(1);

            for &neighbor in &node.neighbors {
                let neighbor_index = self.nodes[neighbor].cell_index;
                if field.blocked[neighbor_index] || field.costs[neighbor_index].is_some() {
                    continue;
                }
                field.costs[neighbor_index] = Some(next_cost);
                field.frontier.push_back(neighbor);
            }
        }
    }

    fn node(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        index(self.columns, cell).and_then(|offset| self.node_of.get(offset).copied().flatten())
    }
}

/// Scratch buffers holding the result of a single [`NavMesh::flood`] query.
///
/// Owned by the caller so that the mesh itself stays immutable; every flood
/// clears the previous costs and blocked flags before propagating.
#[derive(Clone, Debug, Default)]
pub struct DistanceField {
    columns: u32,
    rows: u32,
    root: Option<CellCoord>,
    costs: Vec<Option<u16>>,
    blocked: Vec<bool>,
    frontier: VecDeque<usize>,
}

impl DistanceField {
    /// Creates an empty field that answers `None` for every cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell the most recent flood started from.
    #[must_use]
    pub fn root(&self) -> Option<CellCoord> {
        self.root
    }

    /// Steps from the root to the cell, or `None` when unreachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u16> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        index(self.columns, cell).and_then(|offset| self.costs.get(offset).copied().flatten())
    }

    fn reset(&mut self, columns: u32, rows: u32, root: CellCoord) {
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        self.columns = columns;
        self.rows = rows;
        self.root = Some(root);
        self.costs.clear();
        self.costs.resize(cell_count, None);
        self.blocked.clear();
        self.blocked.resize(cell_count, false);
        self.frontier.clear();
    }
}

fn cell_at(columns: u32, cell_index: usize) -> CellCoord {
    let width = columns.max(1) as usize;
    CellCoord::new((cell_index % width) as u32, (cell_index / width) as u32)
}

fn index(columns: u32, cell: CellCoord) -> Option<usize> {
    let width = usize::try_from(columns).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}
