use docopt::Docopt;
use error_chain::bail;
use log::info;
use serde_derive::Deserialize;
use spanning_mazes::{
    cells::Cell,
    codec::EncodeOptions,
    generators::GenerateAlgorithm,
    grid_displays::{MazeDisplay, PathDisplay, StartEndPointsDisplay},
    pathing::SolveAlgorithm,
    units::{ColumnsCount, RowsCount, UpscaleFactor},
    utils,
    Maze,
};

const USAGE: &str = "Spanning mazes

Usage:
    mazes_driver -h | --help
    mazes_driver create <algorithm> [options]
    mazes_driver solve <maze-file> [options]

Algorithms: backtracking, hunt-kill, eller, sidewinder, prim, kruskal

Options:
    -h --help                Show this screen.
    --rows=<n>               Number of cell rows in a created maze [default: 20].
    --cols=<n>               Number of cell columns in a created maze [default: 20].
    --seed=<n>               Seed the random number generator to get the same maze every time.
    --solve                  Also solve a created maze.
    --solver=<name>          The route finding algorithm [default: depth].
    --start-row=<r>          Row of the route start cell, top row if not given.
    --start-col=<c>          Column of the route start cell, left column if not given.
    --end-row=<r>            Row of the route end cell, bottom row if not given.
    --end-col=<c>            Column of the route end cell, right column if not given.
    --maze-out=<path>        Save the maze, .png or .json.
    --solution-out=<path>    Save the solution, .png or .json.
    --scale=<n>              Pixels per grid position in saved images [default: 3].
    --pretty                 Indent saved JSON.
    --show                   Print the maze, or its solution, as text. Always done when nothing is saved.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_create: bool,
    cmd_solve: bool,
    arg_algorithm: String,
    arg_maze_file: String,
    flag_rows: usize,
    flag_cols: usize,
    flag_seed: Option<u64>,
    flag_solve: bool,
    flag_solver: String,
    flag_start_row: Option<usize>,
    flag_start_col: Option<usize>,
    flag_end_row: Option<usize>,
    flag_end_col: Option<usize>,
    flag_maze_out: String,
    flag_solution_out: String,
    flag_scale: u32,
    flag_pretty: bool,
    flag_show: bool,
}

// The driver wraps the library errors with its own argument checking failures.
mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::spanning_mazes::errors::Error, ::spanning_mazes::errors::ErrorKind);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    let mut maze = Maze::new();

    if args.cmd_create {
        let algorithm = args.arg_algorithm.parse::<GenerateAlgorithm>()?;
        let mut rng = match args.flag_seed {
            Some(seed) => utils::seeded_rng(seed),
            None => utils::entropy_rng(),
        };
        let grid = maze.create(RowsCount(args.flag_rows), ColumnsCount(args.flag_cols), algorithm, &mut rng)?;
        info!("created a {} x {} maze with the {}", grid.rows().0, grid.columns().0, algorithm);
    } else if args.cmd_solve {
        maze.load_maze(&args.arg_maze_file)
            .chain_err(|| format!("Failed to load a maze from {}", args.arg_maze_file))?;
    }

    let path = if args.cmd_solve || args.flag_solve {
        let solver = args.flag_solver.parse::<SolveAlgorithm>()?;
        let start = cell_from_args("start", args.flag_start_row, args.flag_start_col)?;
        let end = cell_from_args("end", args.flag_end_row, args.flag_end_col)?;
        Some(maze.solve(start, end, solver)?)
    } else {
        None
    };

    let options = EncodeOptions {
        scale: UpscaleFactor(args.flag_scale),
        pretty: args.flag_pretty,
    };
    if !args.flag_maze_out.is_empty() {
        maze.save_maze(&args.flag_maze_out, options)
            .chain_err(|| format!("Failed to save the maze to {}", args.flag_maze_out))?;
    }
    if !args.flag_solution_out.is_empty() {
        maze.save_solution(&args.flag_solution_out, options)
            .chain_err(|| format!("Failed to save the solution to {}", args.flag_solution_out))?;
    }

    let nothing_saved = args.flag_maze_out.is_empty() && args.flag_solution_out.is_empty();
    if args.flag_show || nothing_saved {
        match (maze.maze(), path.as_ref()) {
            (Some(grid), Some(path)) => {
                print!("{}", MazeDisplay::with_cell_bodies(grid, &PathDisplay::new(path)));
                if let Some(ends) = StartEndPointsDisplay::from_path(path) {
                    println!();
                    print!("{}", MazeDisplay::with_cell_bodies(grid, &ends));
                }
            }
            (Some(grid), None) => print!("{}", grid),
            _ => {}
        }
    }

    Ok(())
}

/// A route end point needs both its row and column, or neither to use the default corner.
fn cell_from_args(what: &str, row: Option<usize>, col: Option<usize>) -> Result<Option<Cell>> {
    match (row, col) {
        (Some(row), Some(col)) => Ok(Some(Cell::new(row, col))),
        (None, None) => Ok(None),
        _ => bail!("both --{0}-row and --{0}-col are needed to choose the {0} cell", what),
    }
}
