use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use log::debug;
use rand::{seq::SliceRandom, Rng};

use crate::cells::{Cell, CompassPrimary, Position};
use crate::disjoint_set::DisjointSet;
use crate::errors::*;
use crate::grid::MazeGrid;

/// The maze generation algorithms. Every one of them carves a perfect maze: a spanning tree
/// over the logical cells of the grid.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GenerateAlgorithm {
    RecursiveBacktracking,
    HuntAndKill,
    Eller,
    Sidewinder,
    Prim,
    Kruskal,
}

impl GenerateAlgorithm {
    pub fn all() -> [GenerateAlgorithm; 6] {
        [GenerateAlgorithm::RecursiveBacktracking,
         GenerateAlgorithm::HuntAndKill,
         GenerateAlgorithm::Eller,
         GenerateAlgorithm::Sidewinder,
         GenerateAlgorithm::Prim,
         GenerateAlgorithm::Kruskal]
    }

    /// The short name used to select the algorithm, e.g. on the command line.
    pub fn name(&self) -> &'static str {
        match *self {
            GenerateAlgorithm::RecursiveBacktracking => "backtracking",
            GenerateAlgorithm::HuntAndKill => "hunt-kill",
            GenerateAlgorithm::Eller => "eller",
            GenerateAlgorithm::Sidewinder => "sidewinder",
            GenerateAlgorithm::Prim => "prim",
            GenerateAlgorithm::Kruskal => "kruskal",
        }
    }
}

impl fmt::Display for GenerateAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let description = match *self {
            GenerateAlgorithm::RecursiveBacktracking => "Recursive backtracking algorithm",
            GenerateAlgorithm::HuntAndKill => "Hunt and kill algorithm",
            GenerateAlgorithm::Eller => "Eller's algorithm",
            GenerateAlgorithm::Sidewinder => "Sidewinder algorithm",
            GenerateAlgorithm::Prim => "Prim's algorithm",
            GenerateAlgorithm::Kruskal => "Kruskal's algorithm",
        };
        f.write_str(description)
    }
}

impl FromStr for GenerateAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<GenerateAlgorithm> {
        let wanted = s.trim().to_lowercase();
        GenerateAlgorithm::all()
            .iter()
            .cloned()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| ErrorKind::UnknownAlgorithm(s.to_string()).into())
    }
}

/// Run `algorithm` on a freshly allocated, fully closed grid.
pub fn generate<R: Rng + ?Sized>(grid: &mut MazeGrid, algorithm: GenerateAlgorithm, rng: &mut R) {
    match algorithm {
        GenerateAlgorithm::RecursiveBacktracking => recursive_backtracking(grid, rng),
        GenerateAlgorithm::HuntAndKill => hunt_and_kill(grid, rng),
        GenerateAlgorithm::Eller => eller(grid, rng),
        GenerateAlgorithm::Sidewinder => sidewinder(grid, rng),
        GenerateAlgorithm::Prim => prim(grid, rng),
        GenerateAlgorithm::Kruskal => kruskal(grid, rng),
    }
    debug!("{} carved {} passages on a {} x {} grid",
           algorithm,
           grid.open_internal_walls(),
           grid.rows().0,
           grid.columns().0);
}

fn random_cell_position<R: Rng + ?Sized>(grid: &MazeGrid, rng: &mut R) -> Position {
    Cell::new(rng.gen_range(0..grid.rows().0), rng.gen_range(0..grid.columns().0)).as_position()
}

#[inline]
fn cell_position(row: usize, col: usize) -> Position {
    Cell::new(row, col).as_position()
}

/// Carve from `from` into a randomly chosen unvisited neighbour, returning the new cell and the
/// opened wall. None when `from` is a dead end.
fn walk<R: Rng + ?Sized>(grid: &mut MazeGrid, from: Position, rng: &mut R) -> Option<(Position, Position)> {
    for dir in CompassPrimary::shuffled(rng) {
        if let Some((cell, wall)) = from.cell_and_wall_towards(dir) {
            if grid.is_closed(cell) {
                grid.mark_open(wall);
                grid.mark_open(cell);
                return Some((cell, wall));
            }
        }
    }
    None
}

/// A single move of the recursive backtracker.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum BacktrackStep {
    /// A wall and the unvisited cell behind it were opened; the cell is the new stack top.
    Carved { wall: Position, cell: Position },
    /// The stack top was a dead end and got popped.
    Backtracked(Position),
    Finished,
}

/// The recursive backtracking generator as an explicit step machine.
///
/// Each call to `step` makes one visible change, so a front end can draw generation frame by
/// frame by inspecting the grid, the returned step and the stack between calls.
#[derive(Debug, Clone)]
pub struct Backtracker {
    stack: Vec<Position>,
}

impl Backtracker {
    /// Pick a random start cell, open it and make it the bottom of the stack.
    pub fn start<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) -> Backtracker {
        let start = random_cell_position(grid, rng);
        grid.mark_open(start);
        let mut stack = Vec::with_capacity(grid.size());
        stack.push(start);
        Backtracker { stack }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, grid: &mut MazeGrid, rng: &mut R) -> BacktrackStep {
        let current = match self.stack.last() {
            Some(&top) => top,
            None => return BacktrackStep::Finished,
        };

        if let Some((cell, wall)) = walk(grid, current, rng) {
            self.stack.push(cell);
            BacktrackStep::Carved { wall, cell }
        } else {
            let _ = self.stack.pop();
            BacktrackStep::Backtracked(current)
        }
    }

    /// The cell currently being carved from.
    #[inline]
    pub fn current(&self) -> Option<Position> {
        self.stack.last().cloned()
    }

    #[inline]
    pub fn stack(&self) -> &[Position] {
        &self.stack
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Apply the recursive backtracking algorithm to the grid.
///
/// A randomised depth first search: from a random start cell keep carving into a random unvisited
/// neighbour, remembering the way on a stack. At a dead end pop the stack until a cell with an
/// unvisited neighbour turns up and carry on from there. Done once the stack is empty.
/// Gives long winding corridors with few branches.
pub fn recursive_backtracking<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {
    let mut backtracker = Backtracker::start(grid, rng);
    while backtracker.step(grid, rng) != BacktrackStep::Finished {}
}

/// Apply the hunt and kill algorithm to the grid.
///
/// Walks like the recursive backtracker but never keeps a stack. At a dead end it hunts instead:
/// scanning the unfinished rows in order for the first unvisited cell bordering the visited region,
/// carving into it from a random visited neighbour and walking on from there.
/// Rows are struck off the hunt list once all their cells are visited, generation ends when the
/// list is empty.
pub fn hunt_and_kill<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {
    let mut hunt_rows: Vec<usize> = (0..grid.rows().0).collect();

    let mut current = random_cell_position(grid, rng);
    grid.mark_open(current);

    loop {
        while let Some((cell, _)) = walk(grid, current, rng) {
            current = cell;
        }
        match hunt(grid, &mut hunt_rows, rng) {
            Some(cell) => current = cell,
            None => break,
        }
    }
}

fn hunt<R: Rng + ?Sized>(grid: &mut MazeGrid, hunt_rows: &mut Vec<usize>, rng: &mut R) -> Option<Position> {
    let columns = grid.columns().0;

    while !hunt_rows.is_empty() {
        let mut finished_row = None;

        for (i, &row) in hunt_rows.iter().enumerate() {
            let mut finished = true;
            for col in 0..columns {
                let cell = cell_position(row, col);
                if !grid.is_closed(cell) {
                    continue;
                }
                finished = false;

                for dir in CompassPrimary::shuffled(rng) {
                    if let Some((neighbour, _)) = cell.cell_and_wall_towards(dir) {
                        if grid.is_open(neighbour) {
                            grid.carve(neighbour, cell);
                            return Some(cell);
                        }
                    }
                }
            }
            if finished {
                finished_row = Some(i);
                break;
            }
        }

        match finished_row {
            Some(i) => {
                let _ = hunt_rows.remove(i);
            }
            // Unvisited cells remain but none touch the visited region: not on a rectangular grid.
            None => return None,
        }
    }
    None
}

/// Apply Eller's algorithm to the grid.
///
/// Works one row at a time, only ever remembering which set each column of the current row belongs
/// to. Neighbours in a row are randomly joined when in different sets. Then every set sends at least
/// one randomly chosen member down into the next row, which inherits those members' sets; the rest of
/// the next row starts out in fresh sets. The last row joins all remaining different sets so the
/// maze ends up fully connected.
///
/// Cells carried down into the next row keep their set element, so whichever label a merge keeps the
/// carried cells still resolve to the merged set.
pub fn eller<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {
    let (rows, columns) = (grid.rows().0, grid.columns().0);
    let mut sets = DisjointSet::new(0);
    let mut row_sets: Vec<Option<usize>> = vec![None; columns];

    for row in 0..rows {
        let last_row = row + 1 == rows;

        let ids: Vec<usize> = row_sets
            .iter()
            .map(|id| match *id {
                Some(id) => id,
                None => sets.make_set(),
            })
            .collect();
        for col in 0..columns {
            grid.mark_open(cell_position(row, col));
        }

        for col in 1..columns {
            let join = last_row || rng.gen::<bool>();
            if join && sets.union(ids[col - 1], ids[col]) {
                grid.carve(cell_position(row, col - 1), cell_position(row, col));
            }
        }

        if last_row {
            break;
        }

        let mut next_row_sets = vec![None; columns];
        let set_members: Vec<(usize, usize)> = (0..columns)
            .map(|col| (sets.find(ids[col]), col))
            .sorted()
            .collect();

        for (_, members) in &set_members.into_iter().group_by(|&(set_id, _)| set_id) {
            let member_columns: Vec<usize> = members.map(|(_, col)| col).collect();
            let chosen = loop {
                let chosen: Vec<usize> = member_columns.iter()
                    .cloned()
                    .filter(|_| rng.gen::<bool>())
                    .collect();
                if !chosen.is_empty() {
                    break chosen;
                }
            };

            for col in chosen {
                next_row_sets[col] = Some(ids[col]);
                grid.carve(cell_position(row, col), cell_position(row + 1, col));
            }
        }
        row_sets = next_row_sets;
    }
}

/// Apply the sidewinder maze generation algorithm to the grid.
///
/// The first row is one long corridor. Every later row is visited west to east building up a run of
/// horizontally joined cells: a coin flip either carves east, extending the run, or closes the run
/// out by carving north from a random member of it. The last cell of a row can only close out.
/// This algorithm will display a vertical bias and always has the open top row.
pub fn sidewinder<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {
    let (rows, columns) = (grid.rows().0, grid.columns().0);

    grid.mark_open(cell_position(0, 0));
    for col in 1..columns {
        grid.carve(cell_position(0, col - 1), cell_position(0, col));
    }

    for row in 1..rows {
        let mut run = Vec::with_capacity(columns);

        for col in 0..columns {
            let cell = cell_position(row, col);
            grid.mark_open(cell);
            run.push(col);

            let at_run_end_boundary = col + 1 == columns;
            let should_close_out = at_run_end_boundary || rng.gen::<bool>(); // coin flip

            if should_close_out {
                let run_member = run[rng.gen_range(0..run.len())];
                grid.carve(cell_position(row, run_member), cell_position(row - 1, run_member));
                run.clear();
            } else {
                grid.carve(cell, cell_position(row, col + 1));
            }
        }
    }
}

/// Apply (randomised) Prim's algorithm to the grid.
///
/// Grows the maze outwards from a random start cell. The frontier holds every unvisited cell next to
/// the maze so far, marked on the grid so it is only added once. A uniformly random frontier cell is
/// joined to a random visited neighbour and its own unvisited neighbours join the frontier.
pub fn prim<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {
    let start = random_cell_position(grid, rng);
    grid.mark_open(start);

    let mut frontier = Vec::new();
    extend_frontier(grid, start, &mut frontier);

    while !frontier.is_empty() {
        let cell = frontier.swap_remove(rng.gen_range(0..frontier.len()));

        for dir in CompassPrimary::shuffled(rng) {
            if let Some((neighbour, _)) = cell.cell_and_wall_towards(dir) {
                if grid.is_open(neighbour) {
                    grid.carve(cell, neighbour);
                    break;
                }
            }
        }

        extend_frontier(grid, cell, &mut frontier);
    }
}

fn extend_frontier(grid: &mut MazeGrid, from: Position, frontier: &mut Vec<Position>) {
    for neighbour in grid.neighbour_cells(from).iter() {
        if grid.is_closed(*neighbour) {
            grid.mark_frontier(*neighbour);
            frontier.push(*neighbour);
        }
    }
}

/// Apply (randomised) Kruskal's algorithm to the grid.
///
/// Every cell starts in a set of its own. All walls between neighbouring cells are shuffled and
/// visited in that order, a wall is knocked down when the cells either side are still in different
/// sets, merging them.
/// Note the result is a random spanning tree but not a uniformly sampled one.
pub fn kruskal<R: Rng + ?Sized>(grid: &mut MazeGrid, rng: &mut R) {
    let columns = grid.columns().0;
    let set_index = |pos: Position| (pos.row / 2) * columns + pos.col / 2;

    let cells: Vec<Position> = grid.iter_cells().collect();
    for cell in cells {
        grid.mark_open(cell);
    }

    let mut sets = DisjointSet::new(grid.size());
    let mut walls: Vec<(Position, Position, Position)> = grid
        .iter_internal_walls()
        .filter_map(|wall| wall.cells_across_wall().map(|(a, b)| (wall, a, b)))
        .collect();
    walls.shuffle(rng);

    for (wall, a, b) in walls {
        if sets.union(set_index(a), set_index(b)) {
            grid.mark_open(wall);
        }
    }
}
