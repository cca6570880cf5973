//! **spanning_mazes** generates perfect mazes, finds routes through them and saves them as images
//! or JSON.

pub mod cells;
pub mod codec;
pub mod disjoint_set;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod maze;
pub mod pathing;
pub mod storage;
pub mod units;
pub mod utils;

pub use crate::maze::Maze;
