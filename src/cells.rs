use std::fmt;

use rand::{seq::SliceRandom, Rng};
use smallvec::SmallVec;

/// A position on the physical grid of walls and cells.
///
/// Positions with both coordinates odd are maze cells, everything else is a wall or a
/// wall intersection.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// An addressable maze cell in logical `(row, column)` space.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

pub type PositionSmallVec = SmallVec<[Position; 4]>;
pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

/// Neighbour checking order used wherever the order must not be random.
pub const FIXED_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::South,
                                                    CompassPrimary::North,
                                                    CompassPrimary::West,
                                                    CompassPrimary::East];

impl CompassPrimary {
    #[inline]
    pub fn all() -> DirectionSmallVec {
        FIXED_DIRECTIONS.iter().cloned().collect()
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> DirectionSmallVec {
        let mut dirs = CompassPrimary::all();
        dirs.shuffle(rng);
        dirs
    }
}

impl Position {
    #[inline]
    pub fn new(row: usize, col: usize) -> Position {
        Position { row, col }
    }

    /// Creates a new `Position` `step` places away in the given direction.
    /// Returns None if the position is not representable (would go below zero).
    pub fn offset(&self, dir: CompassPrimary, step: usize) -> Option<Position> {
        let (row, col) = (self.row, self.col);
        match dir {
            CompassPrimary::North => row.checked_sub(step).map(|r| Position::new(r, col)),
            CompassPrimary::South => Some(Position::new(row + step, col)),
            CompassPrimary::East => Some(Position::new(row, col + step)),
            CompassPrimary::West => col.checked_sub(step).map(|c| Position::new(row, c)),
        }
    }

    /// The neighbouring cell position two steps away together with the wall position between.
    #[inline]
    pub fn cell_and_wall_towards(&self, dir: CompassPrimary) -> Option<(Position, Position)> {
        match (self.offset(dir, 2), self.offset(dir, 1)) {
            (Some(cell), Some(wall)) => Some((cell, wall)),
            _ => None,
        }
    }

    /// The wall position directly between two physical cell positions that are one logical step apart.
    pub fn wall_between(a: Position, b: Position) -> Option<Position> {
        let row_gap = if a.row > b.row { a.row - b.row } else { b.row - a.row };
        let col_gap = if a.col > b.col { a.col - b.col } else { b.col - a.col };
        match (row_gap, col_gap) {
            (2, 0) | (0, 2) => Some(Position::new((a.row + b.row) / 2, (a.col + b.col) / 2)),
            _ => None,
        }
    }

    /// The two cell positions a wall separates, None if this is not a wall position.
    pub fn cells_across_wall(&self) -> Option<(Position, Position)> {
        if !self.is_wall() {
            return None;
        }
        if self.row % 2 == 0 {
            self.offset(CompassPrimary::North, 1)
                .map(|north| (north, Position::new(self.row + 1, self.col)))
        } else {
            self.offset(CompassPrimary::West, 1)
                .map(|west| (west, Position::new(self.row, self.col + 1)))
        }
    }

    #[inline]
    pub fn is_cell(&self) -> bool {
        self.row % 2 == 1 && self.col % 2 == 1
    }

    /// A wall sits between two cells: exactly one of its coordinates is odd.
    #[inline]
    pub fn is_wall(&self) -> bool {
        (self.row % 2 == 1) != (self.col % 2 == 1)
    }

    /// The logical cell for a physical cell position.
    pub fn as_cell(&self) -> Option<Cell> {
        if self.is_cell() {
            Some(Cell::new(self.row / 2, self.col / 2))
        } else {
            None
        }
    }
}

impl Cell {
    #[inline]
    pub fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    #[inline]
    pub fn as_position(&self) -> Position {
        Position::new(2 * self.row + 1, 2 * self.col + 1)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::utils::seeded_rng;
    use itertools::Itertools;

    #[test]
    fn logical_to_physical() {
        assert_eq!(Cell::new(0, 0).as_position(), Position::new(1, 1));
        assert_eq!(Cell::new(2, 5).as_position(), Position::new(5, 11));
        assert_eq!(Position::new(5, 11).as_cell(), Some(Cell::new(2, 5)));
        assert_eq!(Position::new(4, 11).as_cell(), None);
    }

    #[test]
    fn offsets_do_not_underflow() {
        let p = Position::new(1, 1);
        assert_eq!(p.offset(CompassPrimary::North, 2), None);
        assert_eq!(p.offset(CompassPrimary::West, 2), None);
        assert_eq!(p.offset(CompassPrimary::North, 1), Some(Position::new(0, 1)));
        assert_eq!(p.offset(CompassPrimary::South, 2), Some(Position::new(3, 1)));
        assert_eq!(p.offset(CompassPrimary::East, 2), Some(Position::new(1, 3)));
    }

    #[test]
    fn cell_and_wall() {
        let p = Position::new(3, 3);
        assert_eq!(p.cell_and_wall_towards(CompassPrimary::North),
                   Some((Position::new(1, 3), Position::new(2, 3))));
        assert_eq!(p.cell_and_wall_towards(CompassPrimary::East),
                   Some((Position::new(3, 5), Position::new(3, 4))));
        assert_eq!(Position::new(1, 1).cell_and_wall_towards(CompassPrimary::West), None);
    }

    #[test]
    fn walls_between_cells() {
        let gp = |r, c| Position::new(r, c);
        assert_eq!(Position::wall_between(gp(1, 1), gp(1, 3)), Some(gp(1, 2)));
        assert_eq!(Position::wall_between(gp(3, 1), gp(1, 1)), Some(gp(2, 1)));
        assert_eq!(Position::wall_between(gp(1, 1), gp(3, 3)), None);
        assert_eq!(Position::wall_between(gp(1, 1), gp(1, 1)), None);
        assert!(gp(1, 2).is_wall());
        assert!(gp(2, 1).is_wall());
        assert!(!gp(2, 2).is_wall());
        assert!(!gp(1, 1).is_wall());
    }

    #[test]
    fn cells_either_side_of_a_wall() {
        let gp = |r, c| Position::new(r, c);
        assert_eq!(gp(2, 1).cells_across_wall(), Some((gp(1, 1), gp(3, 1))));
        assert_eq!(gp(1, 2).cells_across_wall(), Some((gp(1, 1), gp(1, 3))));
        assert_eq!(gp(1, 1).cells_across_wall(), None);
        assert_eq!(gp(2, 2).cells_across_wall(), None);
    }

    #[test]
    fn shuffled_directions_are_a_permutation() {
        let mut rng = seeded_rng(7);
        for _ in 0..20 {
            let dirs = CompassPrimary::shuffled(&mut rng);
            assert_eq!(dirs.len(), 4);
            let unique = dirs.iter().map(|d| format!("{:?}", d)).sorted().dedup().count();
            assert_eq!(unique, 4);
        }
    }
}
