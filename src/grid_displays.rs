use std::fmt;

use crate::cells::{CompassPrimary, Position};
use crate::grid::MazeGrid;
use crate::pathing::Path;
use crate::utils::{self, FnvHashSet};

/// Renders the three character wide body of a cell when a grid is drawn as text.
pub trait GridDisplay {
    fn render_cell_body(&self, cell: Position) -> String;
}

/// Marks the cells on a path with a dot.
#[derive(Debug)]
pub struct PathDisplay {
    on_path_positions: FnvHashSet<Position>,
}
impl PathDisplay {
    pub fn new(path: &Path) -> Self {
        let mut on_path_positions = utils::fnv_hashset(path.len());
        on_path_positions.extend(path.positions().iter().cloned());
        PathDisplay { on_path_positions }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, cell: Position) -> String {
        if self.on_path_positions.contains(&cell) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: Position,
    end: Position,
}
impl StartEndPointsDisplay {
    pub fn new(start: Position, end: Position) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }

    pub fn from_path(path: &Path) -> Option<StartEndPointsDisplay> {
        match (path.start(), path.end()) {
            (Some(start), Some(end)) => Some(StartEndPointsDisplay::new(start, end)),
            _ => None,
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, cell: Position) -> String {
        if cell == self.start {
            String::from(" S ")
        } else if cell == self.end {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// A grid drawn with box drawing characters, optionally with custom cell bodies.
pub struct MazeDisplay<'a> {
    grid: &'a MazeGrid,
    cell_bodies: Option<&'a dyn GridDisplay>,
}

impl<'a> MazeDisplay<'a> {
    pub fn new(grid: &'a MazeGrid) -> MazeDisplay<'a> {
        MazeDisplay { grid, cell_bodies: None }
    }

    pub fn with_cell_bodies(grid: &'a MazeGrid, cell_bodies: &'a dyn GridDisplay) -> MazeDisplay<'a> {
        MazeDisplay { grid, cell_bodies: Some(cell_bodies) }
    }

    fn is_wall_drawn(&self, pos: Option<Position>) -> bool {
        pos.map_or(false, |p| self.grid.is_closed(p))
    }

    fn render_junction(&self, pos: Position) -> &'static str {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let wall_towards = |dir| self.is_wall_drawn(pos.offset(dir, 1));
        match (wall_towards(CompassPrimary::West),
               wall_towards(CompassPrimary::East),
               wall_towards(CompassPrimary::North),
               wall_towards(CompassPrimary::South)) {
            (true, true, true, true) => WALL_LRUD,
            (true, true, true, false) => WALL_LRU,
            (true, true, false, true) => WALL_LRD,
            (true, false, true, true) => WALL_LUD,
            (false, true, true, true) => WALL_RUD,
            (true, true, false, false) => WALL_LR,
            (false, false, true, true) => WALL_UD,
            (false, true, true, false) => WALL_RU,
            (true, false, false, true) => WALL_LD,
            (true, false, true, false) => WALL_LU,
            (false, true, false, true) => WALL_RD,
            (true, false, false, false) => WALL_L,
            (false, true, false, false) => WALL_R,
            (false, false, true, false) => WALL_U,
            (false, false, false, true) => WALL_D,
            _ => " ",
        }
    }

    fn render_cell_body(&self, cell: Position) -> String {
        if let Some(displayer) = self.cell_bodies {
            return displayer.render_cell_body(cell);
        }
        // painted cells, e.g. a solution path, are neither open nor closed
        if self.grid.is_open(cell) || self.grid.is_closed(cell) {
            String::from("   ")
        } else {
            String::from(" . ")
        }
    }
}

impl<'a> fmt::Display for MazeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (rows, columns) = (self.grid.physical_rows(), self.grid.physical_columns());

        // Even rows are horizontal walls and their junctions, odd rows are cells and vertical walls.
        let mut output = String::with_capacity(rows * (columns * 2 + 1));
        for row in 0..rows {
            for col in 0..columns {
                let pos = Position::new(row, col);
                match (row % 2 == 0, col % 2 == 0) {
                    (true, true) => output.push_str(self.render_junction(pos)),
                    (true, false) => {
                        output.push_str(if self.grid.is_closed(pos) { "───" } else { "   " })
                    }
                    (false, true) => output.push_str(if self.grid.is_closed(pos) { "│" } else { " " }),
                    (false, false) => output.push_str(self.render_cell_body(pos).as_str()),
                }
            }
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", MazeDisplay::new(self))
    }
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::pathing::{solve, SolveAlgorithm};
    use crate::units::{ColumnsCount, RowsCount};

    fn open_row() -> MazeGrid {
        let mut g = MazeGrid::new(RowsCount(1), ColumnsCount(2)).unwrap();
        g.carve(Position::new(1, 1), Position::new(1, 3));
        g
    }

    #[test]
    fn closed_grid() {
        let g = MazeGrid::new(RowsCount(1), ColumnsCount(1)).unwrap();
        assert_eq!(g.to_string(), "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn open_passage() {
        let g = open_row();
        assert_eq!(g.to_string(), "┌───────┐\n│       │\n└───────┘\n");
    }

    #[test]
    fn vertical_passages() {
        let mut g = MazeGrid::new(RowsCount(2), ColumnsCount(2)).unwrap();
        let gp = |r, c| Position::new(r, c);
        g.carve(gp(1, 1), gp(3, 1));
        g.carve(gp(3, 1), gp(3, 3));
        g.carve(gp(3, 3), gp(1, 3));
        let expected = "┌───┬───┐\n\
                        │   │   │\n\
                        │   ╵   │\n\
                        │       │\n\
                        └───────┘\n";
        assert_eq!(g.to_string(), expected);
    }

    #[test]
    fn solution_paths_are_dotted() {
        let g = open_row();
        let solution = solve(&g, None, None, SolveAlgorithm::DepthFirst).unwrap();
        assert_eq!(solution.grid.to_string(), "┌───────┐\n│ .   . │\n└───────┘\n");

        let path_display = PathDisplay::new(&solution.path);
        let text = MazeDisplay::with_cell_bodies(&g, &path_display).to_string();
        assert_eq!(text, "┌───────┐\n│ .   . │\n└───────┘\n");

        let ends = StartEndPointsDisplay::from_path(&solution.path).unwrap();
        let text = MazeDisplay::with_cell_bodies(&g, &ends).to_string();
        assert_eq!(text, "┌───────┐\n│ S   E │\n└───────┘\n");
    }
}
