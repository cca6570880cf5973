use std::path::Path;

use error_chain::bail;
use log::{info, warn};
use rand::Rng;

use crate::cells::Cell;
use crate::codec::{EncodeOptions, MazeFormat};
use crate::errors::*;
use crate::generators::{self, GenerateAlgorithm};
use crate::grid::MazeGrid;
use crate::pathing::{self, Path as SolutionPath, SolveAlgorithm};
use crate::storage::{FileStore, LocalFileStore};
use crate::units::{ColumnsCount, RowsCount, UpscaleFactor};

/// A maze and, once solved, its solution, kept together with the file store they are saved to.
///
/// Creating or loading a maze throws away any solution of the previous maze.
#[derive(Debug)]
pub struct Maze<S: FileStore = LocalFileStore> {
    store: S,
    maze: Option<MazeGrid>,
    solution: Option<MazeGrid>,
}

impl Maze<LocalFileStore> {
    pub fn new() -> Maze<LocalFileStore> {
        Maze::with_store(LocalFileStore)
    }
}

impl Default for Maze<LocalFileStore> {
    fn default() -> Self {
        Maze::new()
    }
}

impl<S: FileStore> Maze<S> {
    pub fn with_store(store: S) -> Maze<S> {
        Maze { store, maze: None, solution: None }
    }

    #[inline]
    pub fn maze(&self) -> Option<&MazeGrid> {
        self.maze.as_ref()
    }

    #[inline]
    pub fn solution(&self) -> Option<&MazeGrid> {
        self.solution.as_ref()
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn assigned_maze(&self) -> Result<&MazeGrid> {
        self.maze.as_ref().ok_or_else(|| ErrorKind::MazeNotAssigned.into())
    }

    fn assigned_solution(&self) -> Result<&MazeGrid> {
        self.solution.as_ref().ok_or_else(|| ErrorKind::SolutionNotAssigned.into())
    }

    /// Generate a new perfect maze, replacing the current one.
    pub fn create<R: Rng + ?Sized>(&mut self,
                                   rows: RowsCount,
                                   columns: ColumnsCount,
                                   algorithm: GenerateAlgorithm,
                                   rng: &mut R)
                                   -> Result<&MazeGrid> {
        let mut grid = MazeGrid::new(rows, columns)?;
        generators::generate(&mut grid, algorithm, rng);

        self.solution = None;
        Ok(self.maze.insert(grid))
    }

    /// Solve the current maze, `None` end points default to the top left and bottom right cells.
    pub fn solve(&mut self,
                 start: Option<Cell>,
                 end: Option<Cell>,
                 algorithm: SolveAlgorithm)
                 -> Result<SolutionPath> {
        let solution = pathing::solve(self.assigned_maze()?, start, end, algorithm)?;
        self.solution = Some(solution.grid);
        Ok(solution.path)
    }

    /// Save the maze, picking the format from the file extension.
    pub fn save_maze<P: AsRef<Path>>(&mut self, path: P, options: EncodeOptions) -> Result<()> {
        let format = MazeFormat::from_path(&path)?;
        let bytes = format.encode(self.assigned_maze()?, options)?;
        self.write(path.as_ref(), &bytes, "maze")
    }

    /// Save the solution, picking the format from the file extension.
    pub fn save_solution<P: AsRef<Path>>(&mut self, path: P, options: EncodeOptions) -> Result<()> {
        let format = MazeFormat::from_path(&path)?;
        let bytes = format.encode(self.assigned_solution()?, options)?;
        self.write(path.as_ref(), &bytes, "solution")
    }

    pub fn save_maze_as_png<P: AsRef<Path>>(&mut self, path: P, scale: UpscaleFactor) -> Result<()> {
        let bytes = MazeFormat::Png.encode(self.assigned_maze()?, EncodeOptions { scale, pretty: false })?;
        self.write(path.as_ref(), &bytes, "maze")
    }

    pub fn save_maze_as_json<P: AsRef<Path>>(&mut self, path: P, pretty: bool) -> Result<()> {
        let options = EncodeOptions { pretty, ..EncodeOptions::default() };
        let bytes = MazeFormat::Json.encode(self.assigned_maze()?, options)?;
        self.write(path.as_ref(), &bytes, "maze")
    }

    pub fn save_solution_as_png<P: AsRef<Path>>(&mut self, path: P, scale: UpscaleFactor) -> Result<()> {
        let options = EncodeOptions { scale, pretty: false };
        let bytes = MazeFormat::Png.encode(self.assigned_solution()?, options)?;
        self.write(path.as_ref(), &bytes, "solution")
    }

    pub fn save_solution_as_json<P: AsRef<Path>>(&mut self, path: P, pretty: bool) -> Result<()> {
        let options = EncodeOptions { pretty, ..EncodeOptions::default() };
        let bytes = MazeFormat::Json.encode(self.assigned_solution()?, options)?;
        self.write(path.as_ref(), &bytes, "solution")
    }

    /// Load a maze, picking the format from the file extension.
    pub fn load_maze<P: AsRef<Path>>(&mut self, path: P) -> Result<&MazeGrid> {
        let format = MazeFormat::from_path(&path)?;
        self.load_maze_as(path.as_ref(), format)
    }

    pub fn load_solution<P: AsRef<Path>>(&mut self, path: P) -> Result<&MazeGrid> {
        let format = MazeFormat::from_path(&path)?;
        self.load_solution_as(path.as_ref(), format)
    }

    pub fn load_maze_from_png<P: AsRef<Path>>(&mut self, path: P) -> Result<&MazeGrid> {
        self.load_maze_as(path.as_ref(), MazeFormat::Png)
    }

    pub fn load_maze_from_json<P: AsRef<Path>>(&mut self, path: P) -> Result<&MazeGrid> {
        self.load_maze_as(path.as_ref(), MazeFormat::Json)
    }

    pub fn load_solution_from_png<P: AsRef<Path>>(&mut self, path: P) -> Result<&MazeGrid> {
        self.load_solution_as(path.as_ref(), MazeFormat::Png)
    }

    pub fn load_solution_from_json<P: AsRef<Path>>(&mut self, path: P) -> Result<&MazeGrid> {
        self.load_solution_as(path.as_ref(), MazeFormat::Json)
    }

    fn load_maze_as(&mut self, path: &Path, format: MazeFormat) -> Result<&MazeGrid> {
        let grid = self.read(path, format, "maze")?;
        if !grid.is_perfect() {
            warn!("{} is not a perfect maze, solving it may fail", path.display());
        }
        self.solution = None;
        Ok(self.maze.insert(grid))
    }

    fn load_solution_as(&mut self, path: &Path, format: MazeFormat) -> Result<&MazeGrid> {
        let grid = self.read(path, format, "solution")?;
        self.solution = Some(grid);
        self.assigned_solution()
    }

    fn read(&self, path: &Path, format: MazeFormat, what: &str) -> Result<MazeGrid> {
        if !self.store.file_exists(path) {
            bail!(ErrorKind::MissingFile(path.display().to_string()));
        }
        let bytes = self.store.read_file(path)?;
        let grid = format.decode(&bytes)
            .chain_err(|| format!("{} is not a valid {} {} file", path.display(), format, what))?;
        info!("loaded a {} x {} {} from {}", grid.rows().0, grid.columns().0, what, path.display());
        Ok(grid)
    }

    fn write(&mut self, path: &Path, bytes: &[u8], what: &str) -> Result<()> {
        self.store.write_file(path, bytes)?;
        info!("saved the {} to {} ({} bytes)", what, path.display(), bytes.len());
        Ok(())
    }
}
