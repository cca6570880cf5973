use std::convert::TryFrom;
use std::fmt;

use error_chain::bail;
use image::{Rgb, RgbImage};
use petgraph::{algo, graph::{NodeIndex, UnGraph}};

use crate::cells::{Cell, CompassPrimary, Position, PositionSmallVec};
use crate::errors::*;
use crate::units::{ColumnsCount, RowsCount};

/// A closed (unvisited) position: walls, and cells not yet carved.
pub const CLOSED: Rgb<u8> = Rgb([0, 0, 0]);
/// An open (visited) cell or passage.
pub const OPEN: Rgb<u8> = Rgb([255, 255, 255]);
/// A cell waiting on Prim's frontier. Distinct from both open and closed.
pub const FRONTIER: Rgb<u8> = Rgb([1, 1, 1]);

/// The physical cell and wall grid of a maze.
///
/// A maze of `rows x columns` logical cells is stored as a `(2 * rows + 1) x (2 * columns + 1)`
/// grid of pixels. Logical cell `(r, c)` lives at physical position `(2r + 1, 2c + 1)`.
/// A pixel is either closed, open or, on a solution grid, a path colour.
#[derive(Clone, PartialEq)]
pub struct MazeGrid {
    pixels: RgbImage,
}

impl fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MazeGrid :: rows: {:?}, columns: {:?}, physical: {} x {}",
               self.rows(), self.columns(), self.physical_rows(), self.physical_columns())
    }
}

/// `2n + 1` positions for `n` cells, None when that does not fit an image side.
fn physical_length(cells: usize) -> Option<u32> {
    cells.checked_mul(2)
        .and_then(|n| n.checked_add(1))
        .and_then(|n| u32::try_from(n).ok())
}

impl MazeGrid {
    /// Allocate a fully closed grid for `rows x columns` logical cells.
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<MazeGrid> {
        let (RowsCount(r), ColumnsCount(c)) = (rows, columns);
        if r == 0 || c == 0 {
            bail!(ErrorKind::InvalidDimensions(r, c));
        }
        let (width, height) = match (physical_length(c), physical_length(r)) {
            (Some(width), Some(height)) => (width, height),
            _ => bail!(ErrorKind::InvalidDimensions(r, c)),
        };
        // the pixel buffer length has to fit in memory addressing too
        let subpixels = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(3));
        if subpixels.is_none() {
            bail!(ErrorKind::InvalidDimensions(r, c));
        }
        Ok(MazeGrid { pixels: RgbImage::from_pixel(width, height, CLOSED) })
    }

    /// Wrap an existing image, e.g. one decoded from a file. Any non empty image is accepted.
    pub fn from_image(pixels: RgbImage) -> Result<MazeGrid> {
        if pixels.width() == 0 || pixels.height() == 0 {
            bail!(ErrorKind::MalformedGrid(String::from("the grid has no pixels")));
        }
        Ok(MazeGrid { pixels })
    }

    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.pixels
    }

    /// Logical rows count.
    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.physical_rows() / 2)
    }

    /// Logical columns count.
    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.physical_columns() / 2)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows().0 * self.columns().0
    }

    #[inline]
    pub fn physical_rows(&self) -> usize {
        self.pixels.height() as usize
    }

    #[inline]
    pub fn physical_columns(&self) -> usize {
        self.pixels.width() as usize
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.physical_rows() && pos.col < self.physical_columns()
    }

    /// Is the logical cell within the grid's logical dimensions.
    #[inline]
    pub fn is_valid_cell(&self, cell: Cell) -> bool {
        cell.row < self.rows().0 && cell.col < self.columns().0
    }

    /// Pixel at a physical position, None when out of bounds.
    #[inline]
    pub fn pixel(&self, pos: Position) -> Option<Rgb<u8>> {
        if self.in_bounds(pos) {
            Some(*self.pixels.get_pixel(pos.col as u32, pos.row as u32))
        } else {
            None
        }
    }

    /// Panics if the position is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, pos: Position, colour: Rgb<u8>) {
        self.pixels.put_pixel(pos.col as u32, pos.row as u32, colour);
    }

    #[inline]
    pub fn is_open(&self, pos: Position) -> bool {
        self.pixel(pos) == Some(OPEN)
    }

    /// Closed means never visited. Out of bounds positions are neither open nor closed.
    #[inline]
    pub fn is_closed(&self, pos: Position) -> bool {
        self.pixel(pos) == Some(CLOSED)
    }

    #[inline]
    pub fn mark_open(&mut self, pos: Position) {
        self.set_pixel(pos, OPEN);
    }

    #[inline]
    pub fn mark_closed(&mut self, pos: Position) {
        self.set_pixel(pos, CLOSED);
    }

    #[inline]
    pub fn mark_frontier(&mut self, pos: Position) {
        self.set_pixel(pos, FRONTIER);
    }

    #[inline]
    pub fn is_frontier(&self, pos: Position) -> bool {
        self.pixel(pos) == Some(FRONTIER)
    }

    /// Open the wall between two adjacent cell positions and both cells.
    pub fn carve(&mut self, from: Position, to: Position) {
        if let Some(wall) = Position::wall_between(from, to) {
            self.mark_open(from);
            self.mark_open(wall);
            self.mark_open(to);
        }
    }

    /// Physical cell positions one logical step away (offset two) that are within the grid.
    pub fn neighbour_cells(&self, pos: Position) -> PositionSmallVec {
        CompassPrimary::all()
            .iter()
            .filter_map(|dir| pos.offset(*dir, 2))
            .filter(|p| self.in_bounds(*p))
            .collect()
    }

    /// Iterate the physical positions of all logical cells in row major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = Position> {
        let (rows, columns) = (self.rows().0, self.columns().0);
        (0..rows).flat_map(move |r| (0..columns).map(move |c| Cell::new(r, c).as_position()))
    }

    /// Iterate the positions of every wall lying between two logical cells, i.e. excluding the
    /// outer border.
    pub fn iter_internal_walls(&self) -> impl Iterator<Item = Position> {
        let (rows, columns) = (self.rows().0, self.columns().0);
        let horizontal_links = (0..rows)
            .flat_map(move |r| (1..columns).map(move |c| Position::new(2 * r + 1, 2 * c)));
        let vertical_links = (1..rows)
            .flat_map(move |r| (0..columns).map(move |c| Position::new(2 * r, 2 * c + 1)));
        horizontal_links.chain(vertical_links)
    }

    pub fn open_internal_walls(&self) -> usize {
        self.iter_internal_walls().filter(|w| self.is_open(*w)).count()
    }

    /// Graph of logical cells linked by open internal walls. Node index is the row major cell index.
    pub fn passage_graph(&self) -> UnGraph<Cell, ()> {
        let columns = self.columns().0;
        let mut graph = UnGraph::with_capacity(self.size(), self.size());
        for r in 0..self.rows().0 {
            for c in 0..columns {
                let _ = graph.add_node(Cell::new(r, c));
            }
        }

        let index_of = |pos: Position| -> Option<usize> {
            pos.as_cell().map(|cell| cell.row * columns + cell.col)
        };
        for wall in self.iter_internal_walls().filter(|w| self.is_open(*w)) {
            if let Some((a, b)) = wall.cells_across_wall() {
                if let (Some(ai), Some(bi)) = (index_of(a), index_of(b)) {
                    let _ = graph.add_edge(NodeIndex::new(ai), NodeIndex::new(bi), ());
                }
            }
        }
        graph
    }

    /// A perfect maze: every logical cell is open, the open passages connect all cells and there
    /// are exactly `cells - 1` of them, so the passage graph is a spanning tree.
    pub fn is_perfect(&self) -> bool {
        if self.iter_cells().any(|cell| !self.is_open(cell)) {
            return false;
        }
        let graph = self.passage_graph();
        graph.edge_count() + 1 == graph.node_count() && algo::connected_components(&graph) == 1
    }
}
