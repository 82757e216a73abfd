use error_chain::bail;
use petgraph::algo;
use petgraph::graph::{NodeIndex, UnGraph};
use std::{fmt, mem};

use crate::cells::{Cell, CompassPrimary, CoordinateOptionSmallVec, CoordinateSmallVec,
                   GridCoordinate};
use crate::errors::*;
use crate::units::{Depth, EdgesCount, NodesCount, Width};

/// Largest cell count whose storage a `Vec<Cell>` can hold.
pub const MAX_CELLS: usize = isize::MAX as usize / mem::size_of::<Cell>();

/// Every orthogonal neighbour pair of a full `width * depth` grid, saturating at `usize::MAX`.
pub fn full_grid_edges_count(width: Width, depth: Depth) -> usize {
    let (Width(w), Depth(d)) = (width, depth);
    let east_west = w.saturating_sub(1).saturating_mul(d);
    let north_south = w.saturating_mul(d.saturating_sub(1));
    east_west.saturating_add(north_south)
}

/// A `width * depth` rectangle of cells stored row-major, row `z` after row `z - 1`.
///
/// Passages between cells are recorded as cleared wall flags on both cells that share the wall.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: Width,
    depth: Depth,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotAdjacent,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, depth: {:?}, links: {:?}",
               self.width, self.depth, self.links_count())
    }
}

impl Grid {
    /// Create a grid with every wall standing and no cell visited.
    ///
    /// Fails with `InvalidDimensions` if either side is zero, a side does not fit a `u32`
    /// coordinate, or the cell count is more than `MAX_CELLS`.
    pub fn new(width: Width, depth: Depth) -> Result<Grid> {
        let (Width(w), Depth(d)) = (width, depth);
        let invalid = || ErrorKind::InvalidDimensions(w, d);

        if w == 0 || d == 0 || w > u32::MAX as usize || d > u32::MAX as usize {
            bail!(invalid());
        }
        let size = w.checked_mul(d).ok_or_else(invalid)?;
        if size > MAX_CELLS {
            bail!(invalid());
        }

        let cells = (0..size)
            .map(|index| Cell::new(GridCoordinate::from_row_major_index(index, width)))
            .collect();

        Ok(Grid {
            cells,
            width,
            depth,
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Node and edge counts of the full grid graph, every orthogonal neighbour pair as an edge.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        (NodesCount(self.size()), EdgesCount(full_grid_edges_count(self.width, self.depth)))
    }

    /// Close every wall and clear every visited flag.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }

    #[inline]
    pub fn cell(&self, coord: GridCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    pub fn cell_mut(&mut self, coord: GridCoordinate) -> Option<&mut Cell> {
        match self.grid_coordinate_to_index(coord) {
            Some(index) => Some(&mut self.cells[index]),
            None => None,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_visited(&self, coord: GridCoordinate) -> bool {
        self.cell(coord).map_or(false, |cell| cell.visited)
    }

    pub fn set_visited(&mut self, coord: GridCoordinate, visited: bool) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.visited = visited;
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.z as usize) < self.depth.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.z as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    /// Open the wall shared by two adjacent cells, on both cells.
    ///
    /// Linking an already linked pair is a no-op.
    pub fn link(&mut self, a: GridCoordinate, b: GridCoordinate) -> ::std::result::Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        let (a_index, b_index) = match (self.grid_coordinate_to_index(a),
                                        self.grid_coordinate_to_index(b)) {
            (Some(a_index), Some(b_index)) => (a_index, b_index),
            _ => return Err(CellLinkError::InvalidGridCoordinate),
        };
        let dir = CompassPrimary::between(a, b).ok_or(CellLinkError::NotAdjacent)?;

        self.cells[a_index].walls.set(dir, false);
        self.cells[b_index].walls.set(dir.opposite(), false);
        Ok(())
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        match (self.cell(a), CompassPrimary::between(a, b)) {
            (Some(cell), Some(dir)) => self.is_valid_coordinate(b) && cell.walls.is_open(dir),
            _ => false,
        }
    }

    pub fn is_neighbour_linked(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Cells that are linked to a particular cell by a passage.
    /// Returns None for an invalid coordinate.
    pub fn links(&self, coord: GridCoordinate) -> Option<CoordinateSmallVec> {
        self.cell(coord).map(|cell| {
            CompassPrimary::ALL
                .iter()
                .filter(|dir| cell.walls.is_open(**dir))
                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                .collect()
        })
    }

    /// Number of open internal walls, each passage counted once.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Cells that are to the North, South, East or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbours_at_directions(&self,
                                    coord: GridCoordinate,
                                    dirs: &[CompassPrimary])
                                    -> CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        direction.offset(coord).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Every cell coordinate in row-major order.
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: self.size(),
            width: self.width,
        }
    }

    /// Every passage once, as a pair of coordinates with the lower row-major index first.
    pub fn iter_links(&self) -> LinksIter {
        LinksIter {
            grid: self,
            cell_index: 0,
            dir_index: 0,
        }
    }

    /// The passages of the maze as an undirected graph, one node per cell in row-major order.
    pub fn passage_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges_hint)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges_hint);
        for cell in &self.cells {
            let _ = graph.add_node(cell.coordinate());
        }
        let indexed_links = self.iter_links().filter_map(|(a, b)| {
            Some((self.grid_coordinate_to_index(a)?, self.grid_coordinate_to_index(b)?))
        });
        for (a_index, b_index) in indexed_links {
            let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
        }
        graph
    }

    /// A perfect maze is a spanning tree over the cells: a single connected component with
    /// exactly `size - 1` passages.
    pub fn is_perfect(&self) -> bool {
        let graph = self.passage_graph();
        graph.edge_count() == self.size() - 1 && algo::connected_components(&graph) == 1
    }

    /// Number of wall flags cleared on one side only. Zero for any grid built through `link`.
    pub fn asymmetric_walls_count(&self) -> usize {
        let mut count = 0;
        for cell in &self.cells {
            for dir in CompassPrimary::ALL.iter() {
                if cell.walls.is_closed(*dir) {
                    continue;
                }
                let matched = self.neighbour_at_direction(cell.coordinate(), *dir)
                    .and_then(|neighbour| self.cell(neighbour))
                    .map_or(false, |neighbour| neighbour.walls.is_open(dir.opposite()));
                if !matched {
                    count += 1;
                }
            }
        }
        count
    }
}

#[derive(Debug, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
    width: Width,
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = GridCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number, self.width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

pub struct LinksIter<'a> {
    grid: &'a Grid,
    cell_index: usize,
    dir_index: usize,
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        // Only looking South and East visits every passage exactly once.
        const FORWARD_DIRS: [CompassPrimary; 2] = [CompassPrimary::East, CompassPrimary::South];

        while self.cell_index < self.grid.size() {
            let cell = &self.grid.cells[self.cell_index];
            while self.dir_index < FORWARD_DIRS.len() {
                let dir = FORWARD_DIRS[self.dir_index];
                self.dir_index += 1;
                if cell.walls.is_open(dir) {
                    if let Some(neighbour) = self.grid.neighbour_at_direction(cell.coordinate(), dir) {
                        return Some((cell.coordinate(), neighbour));
                    }
                }
            }
            self.cell_index += 1;
            self.dir_index = 0;
        }
        None
    }
}

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: cell index : {:?}", self.cell_index)
    }
}
