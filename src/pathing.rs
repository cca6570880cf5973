use std::fmt;
use std::str::FromStr;

use error_chain::bail;
use image::Rgb;
use log::debug;

use crate::cells::{Cell, Position, FIXED_DIRECTIONS};
use crate::errors::*;
use crate::grid::MazeGrid;
use crate::utils;

/// First colour of a solution path.
pub const PATH_START_COLOUR: Rgb<u8> = Rgb([0, 0, 255]);
/// Last colour of a solution path.
pub const PATH_END_COLOUR: Rgb<u8> = Rgb([255, 0, 0]);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SolveAlgorithm {
    DepthFirst,
}

impl SolveAlgorithm {
    pub fn all() -> [SolveAlgorithm; 1] {
        [SolveAlgorithm::DepthFirst]
    }

    pub fn name(&self) -> &'static str {
        match *self {
            SolveAlgorithm::DepthFirst => "depth",
        }
    }
}

impl Default for SolveAlgorithm {
    fn default() -> Self {
        SolveAlgorithm::DepthFirst
    }
}

impl fmt::Display for SolveAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SolveAlgorithm::DepthFirst => f.write_str("Depth first search"),
        }
    }
}

impl FromStr for SolveAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<SolveAlgorithm> {
        let wanted = s.trim().to_lowercase();
        SolveAlgorithm::all()
            .iter()
            .cloned()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| ErrorKind::UnknownAlgorithm(s.to_string()).into())
    }
}

/// An ordered route of physical positions, cells and the walls between them, start and end inclusive.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Path {
    positions: Vec<Position>,
}

impl Path {
    pub fn new(positions: Vec<Position>) -> Path {
        Path { positions }
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn start(&self) -> Option<Position> {
        self.positions.first().cloned()
    }

    pub fn end(&self) -> Option<Position> {
        self.positions.last().cloned()
    }

    /// The colour of the `index`th position, blending from `PATH_START_COLOUR` to `PATH_END_COLOUR`.
    pub fn colour_at(&self, index: usize) -> Rgb<u8> {
        let t = if self.positions.len() > 1 {
            index as f64 / (self.positions.len() - 1) as f64
        } else {
            0.0
        };
        lerp_colour(PATH_START_COLOUR, PATH_END_COLOUR, t.min(1.0))
    }

    /// Every step is to a directly adjacent physical position.
    pub fn is_contiguous(&self) -> bool {
        self.positions.windows(2).all(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let row_gap = if a.row > b.row { a.row - b.row } else { b.row - a.row };
            let col_gap = if a.col > b.col { a.col - b.col } else { b.col - a.col };
            row_gap + col_gap == 1
        })
    }

    /// No position is visited twice.
    pub fn is_simple(&self) -> bool {
        let mut seen = utils::fnv_hashset(self.positions.len());
        self.positions.iter().all(|pos| seen.insert(*pos))
    }
}

fn lerp_colour(from: Rgb<u8>, to: Rgb<u8>, t: f64) -> Rgb<u8> {
    let channel = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Rgb([channel(from[0], to[0]), channel(from[1], to[1]), channel(from[2], to[2])])
}

/// A solved maze: the route found and a copy of the maze grid with that route painted on it.
#[derive(Clone, Debug)]
pub struct Solution {
    pub path: Path,
    pub grid: MazeGrid,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum Phase {
    Walking,
    Backtracking,
}

/// A single move of the depth first solver.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SolveStep {
    /// Moved through an open wall into an unvisited cell.
    Advanced { wall: Position, cell: Position },
    /// Dropped the top of the path stack, a wall or a dead end cell.
    Retreated(Position),
    /// The top of the path stack is the end cell.
    Solved,
    /// The path stack emptied without reaching the end cell.
    Stuck,
}

/// Depth first search from one cell to another as a walking / backtracking state machine.
///
/// Visited positions are closed off on a private copy of the maze, the maze itself is never touched.
/// The path stack holds cells and the walls between them so once solved it is the route itself.
#[derive(Clone, Debug)]
pub struct DepthFirstSolver {
    unvisited: MazeGrid,
    stack: Vec<Position>,
    end: Position,
    phase: Phase,
}

impl DepthFirstSolver {
    /// Start a search, both cells must lie within the maze.
    pub fn new(maze: &MazeGrid, start: Cell, end: Cell) -> Result<DepthFirstSolver> {
        check_cell(maze, "start", start)?;
        check_cell(maze, "end", end)?;

        let start = start.as_position();
        let mut unvisited = maze.clone();
        unvisited.mark_closed(start);

        let mut stack = Vec::with_capacity(maze.physical_rows() * maze.physical_columns() / 2);
        stack.push(start);

        Ok(DepthFirstSolver {
            unvisited,
            stack,
            end: end.as_position(),
            phase: Phase::Walking,
        })
    }

    pub fn step(&mut self) -> SolveStep {
        let current = match self.stack.last() {
            Some(&top) => top,
            None => return SolveStep::Stuck,
        };
        if current == self.end {
            return SolveStep::Solved;
        }

        match self.phase {
            Phase::Walking => {
                if let Some((wall, cell)) = self.unvisited_step(current) {
                    self.unvisited.mark_closed(wall);
                    self.unvisited.mark_closed(cell);
                    self.stack.push(wall);
                    self.stack.push(cell);
                    SolveStep::Advanced { wall, cell }
                } else {
                    self.phase = Phase::Backtracking;
                    self.retreat()
                }
            }
            Phase::Backtracking => self.retreat(),
        }
    }

    fn retreat(&mut self) -> SolveStep {
        let popped = match self.stack.pop() {
            Some(pos) => pos,
            None => return SolveStep::Stuck,
        };
        if let Some(&top) = self.stack.last() {
            if top.is_cell() && self.unvisited_step(top).is_some() {
                self.phase = Phase::Walking;
            }
        }
        SolveStep::Retreated(popped)
    }

    /// The first neighbouring cell in the fixed direction order reachable through an open wall and
    /// not yet visited, with that wall.
    fn unvisited_step(&self, from: Position) -> Option<(Position, Position)> {
        FIXED_DIRECTIONS
            .iter()
            .filter_map(|dir| from.cell_and_wall_towards(*dir))
            .find(|&(cell, wall)| self.unvisited.is_open(wall) && self.unvisited.is_open(cell))
            .map(|(cell, wall)| (wall, cell))
    }

    #[inline]
    pub fn stack(&self) -> &[Position] {
        &self.stack
    }

    /// Step until solved, the route is the stack.
    pub fn run(mut self) -> Option<Path> {
        loop {
            match self.step() {
                SolveStep::Solved => return Some(Path::new(self.stack)),
                SolveStep::Stuck => return None,
                _ => {}
            }
        }
    }
}

/// The default route runs from the top left cell to the bottom right cell.
pub fn default_end_points(maze: &MazeGrid) -> (Cell, Cell) {
    (Cell::new(0, 0), Cell::new(maze.rows().0.saturating_sub(1), maze.columns().0.saturating_sub(1)))
}

fn check_cell(maze: &MazeGrid, what: &'static str, cell: Cell) -> Result<()> {
    if !maze.is_valid_cell(cell) {
        bail!(ErrorKind::CoordinateOutOfRange(what, cell, maze.rows().0, maze.columns().0));
    }
    Ok(())
}

/// Find the route between two logical cells of the maze, defaulting to the opposite corners.
pub fn solve(maze: &MazeGrid,
             start: Option<Cell>,
             end: Option<Cell>,
             algorithm: SolveAlgorithm)
             -> Result<Solution> {
    let (default_start, default_end) = default_end_points(maze);
    let start = start.unwrap_or(default_start);
    let end = end.unwrap_or(default_end);
    let path = match algorithm {
        SolveAlgorithm::DepthFirst => DepthFirstSolver::new(maze, start, end)?.run(),
    };
    let path = match path {
        Some(path) => path,
        None => bail!(ErrorKind::Unsolvable(start, end)),
    };
    debug!("{} found a path of {} positions from {} to {}", algorithm, path.len(), start, end);

    let mut grid = maze.clone();
    for (i, pos) in path.positions().iter().enumerate() {
        grid.set_pixel(*pos, path.colour_at(i));
    }

    Ok(Solution { path, grid })
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::{generate, GenerateAlgorithm};
    use crate::grid::{CLOSED, OPEN};
    use crate::units::{ColumnsCount, RowsCount};
    use crate::utils::seeded_rng;
    use quickcheck::{quickcheck, TestResult};

    fn grid(rows: usize, columns: usize) -> MazeGrid {
        MazeGrid::new(RowsCount(rows), ColumnsCount(columns)).expect("valid dimensions")
    }

    fn open_square() -> MazeGrid {
        let mut g = grid(2, 2);
        let gp = |r, c| Position::new(r, c);
        g.carve(gp(1, 1), gp(1, 3));
        g.carve(gp(1, 3), gp(3, 3));
        g.carve(gp(1, 1), gp(3, 1));
        g.carve(gp(3, 1), gp(3, 3));
        g
    }

    #[test]
    fn two_by_two_l_shaped_route() {
        let maze = open_square();
        let solution = solve(&maze, None, None, SolveAlgorithm::DepthFirst).unwrap();
        let gp = |r, c| Position::new(r, c);
        // south is tried before east
        assert_eq!(solution.path.positions(),
                   &[gp(1, 1), gp(2, 1), gp(3, 1), gp(3, 2), gp(3, 3)]);
        assert!(solution.path.is_contiguous());
        assert!(solution.path.is_simple());
    }

    #[test]
    fn start_equals_end() {
        let mut g = grid(1, 1);
        g.mark_open(Position::new(1, 1));
        let solution = solve(&g, None, None, SolveAlgorithm::DepthFirst).unwrap();
        assert_eq!(solution.path.positions(), &[Position::new(1, 1)]);
        assert_eq!(solution.grid.pixel(Position::new(1, 1)), Some(PATH_START_COLOUR));

        let maze = open_square();
        let here = Cell::new(1, 0);
        let solution = solve(&maze, Some(here), Some(here), SolveAlgorithm::DepthFirst).unwrap();
        assert_eq!(solution.path.len(), 1);
    }

    #[test]
    fn maze_is_left_untouched() {
        let maze = open_square();
        let before = maze.clone();
        let solution = solve(&maze, None, None, SolveAlgorithm::DepthFirst).unwrap();
        assert_eq!(maze, before);

        // off the path the solution grid matches the maze
        let on_path = |p: &Position| solution.path.positions().contains(p);
        for r in 0..maze.physical_rows() {
            for c in 0..maze.physical_columns() {
                let p = Position::new(r, c);
                if !on_path(&p) {
                    assert_eq!(solution.grid.pixel(p), maze.pixel(p));
                }
            }
        }
    }

    #[test]
    fn path_gradient() {
        let maze = open_square();
        let solution = solve(&maze, None, None, SolveAlgorithm::DepthFirst).unwrap();
        let path = &solution.path;
        assert_eq!(path.colour_at(0), PATH_START_COLOUR);
        assert_eq!(path.colour_at(4), PATH_END_COLOUR);
        assert_eq!(path.colour_at(2), Rgb([128, 0, 128]));
        for (i, pos) in path.positions().iter().enumerate() {
            assert_eq!(solution.grid.pixel(*pos), Some(path.colour_at(i)));
        }
    }

    #[test]
    fn out_of_range_end_points() {
        let maze = open_square();
        let err = solve(&maze, Some(Cell::new(2, 0)), None, SolveAlgorithm::DepthFirst).unwrap_err();
        match *err.kind() {
            ErrorKind::CoordinateOutOfRange(what, cell, 2, 2) => {
                assert_eq!(what, "start");
                assert_eq!(cell, Cell::new(2, 0));
            }
            ref other => panic!("unexpected error {:?}", other),
        }

        let err = solve(&maze, None, Some(Cell::new(0, 7)), SolveAlgorithm::DepthFirst).unwrap_err();
        match *err.kind() {
            ErrorKind::CoordinateOutOfRange("end", _, _, _) => {}
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn solver_rejects_cells_outside_the_maze() {
        let maze = open_square();
        match *DepthFirstSolver::new(&maze, Cell::new(5, 5), Cell::new(0, 0)).unwrap_err().kind() {
            ErrorKind::CoordinateOutOfRange("start", cell, 2, 2) => assert_eq!(cell, Cell::new(5, 5)),
            ref other => panic!("unexpected error {:?}", other),
        }
        match *DepthFirstSolver::new(&maze, Cell::new(0, 0), Cell::new(0, 2)).unwrap_err().kind() {
            ErrorKind::CoordinateOutOfRange("end", cell, 2, 2) => assert_eq!(cell, Cell::new(0, 2)),
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn disconnected_grid_is_unsolvable() {
        let mut g = grid(2, 2);
        let gp = |r, c| Position::new(r, c);
        g.carve(gp(1, 1), gp(1, 3));
        g.carve(gp(3, 1), gp(3, 3));
        let err = solve(&g, None, None, SolveAlgorithm::DepthFirst).unwrap_err();
        match *err.kind() {
            ErrorKind::Unsolvable(start, end) => {
                assert_eq!(start, Cell::new(0, 0));
                assert_eq!(end, Cell::new(1, 1));
            }
            ref other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn solver_backtracks_out_of_dead_ends() {
        // A comb: the spine is the top row, every column hangs down from it.
        let mut g = grid(3, 3);
        for col in 0..3 {
            let top = Cell::new(0, col).as_position();
            if col > 0 {
                g.carve(Cell::new(0, col - 1).as_position(), top);
            }
            g.carve(top, Cell::new(1, col).as_position());
            g.carve(Cell::new(1, col).as_position(), Cell::new(2, col).as_position());
        }
        assert!(g.is_perfect());

        let mut solver = DepthFirstSolver::new(&g, Cell::new(0, 0), Cell::new(2, 2)).unwrap();
        let mut retreats = 0;
        loop {
            match solver.step() {
                SolveStep::Retreated(_) => retreats += 1,
                SolveStep::Solved => break,
                SolveStep::Stuck => panic!("comb is connected"),
                SolveStep::Advanced { .. } => {}
            }
        }
        // down the first two teeth and back out again
        assert_eq!(retreats, 8);
        let path = Path::new(solver.stack().to_vec());
        assert_eq!(path.len(), 9);
        assert!(path.is_contiguous());
        assert!(path.is_simple());
    }

    #[test]
    fn routes_through_generated_mazes() {
        fn p(rows: u8, columns: u8, seed: u64, picks: (u8, u8, u8, u8)) -> TestResult {
            let (rows, columns) = (rows as usize % 10, columns as usize % 10);
            if rows == 0 || columns == 0 {
                return TestResult::discard();
            }
            let start = Cell::new(picks.0 as usize % rows, picks.1 as usize % columns);
            let end = Cell::new(picks.2 as usize % rows, picks.3 as usize % columns);

            let mut rng = seeded_rng(seed);
            let ok = GenerateAlgorithm::all().iter().all(|&algorithm| {
                let mut maze = grid(rows, columns);
                generate(&mut maze, algorithm, &mut rng);
                match solve(&maze, Some(start), Some(end), SolveAlgorithm::DepthFirst) {
                    Ok(Solution { path, .. }) => {
                        path.start() == Some(start.as_position()) &&
                        path.end() == Some(end.as_position()) &&
                        path.is_contiguous() &&
                        path.is_simple() &&
                        path.positions().iter().all(|p| maze.is_open(*p))
                    }
                    Err(_) => false,
                }
            });
            TestResult::from_bool(ok)
        }
        quickcheck(p as fn(u8, u8, u64, (u8, u8, u8, u8)) -> TestResult);
    }

    #[test]
    fn solution_grid_keeps_walls() {
        let mut maze = grid(6, 6);
        generate(&mut maze, GenerateAlgorithm::Kruskal, &mut seeded_rng(4));
        let solution = solve(&maze, None, None, SolveAlgorithm::DepthFirst).unwrap();
        let closed = |g: &MazeGrid| g.image().pixels().filter(|p| **p == CLOSED).count();
        assert_eq!(closed(&solution.grid), closed(&maze));
        let open = solution.grid.image().pixels().filter(|p| **p == OPEN).count();
        assert_eq!(open + solution.path.len(), 6 * 6 * 2 - 1);
    }

    #[test]
    fn solve_algorithm_names() {
        assert_eq!("depth".parse::<SolveAlgorithm>().unwrap(), SolveAlgorithm::DepthFirst);
        assert!("breadth".parse::<SolveAlgorithm>().is_err());
        assert_eq!(SolveAlgorithm::default().name(), "depth");
    }
}
