// Create the Error, ErrorKind, ResultExt, and Result types
// Result is a typedef of std `Result` with the error type our own `Error`
// Defines the From conversions that let `?` work for our `Error`.
// ResultExt adds the `chain_err` trait method.
use error_chain::*;

use crate::cells::Cell;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        ImageFailure(::image::ImageError);
        JsonFailure(::serde_json::Error);
    }

    errors {
        InvalidDimensions(rows: usize, columns: usize) {
            description("invalid maze dimensions")
            display("row and column count must be greater than zero, got {} x {}", rows, columns)
        }
        UnknownAlgorithm(name: String) {
            description("unknown algorithm")
            display("unknown algorithm '{}'", name)
        }
        UnknownFormat(path: String) {
            description("unknown maze file format")
            display("cannot tell the maze file format of '{}', expected a .png or .json extension", path)
        }
        InvalidUpscaleFactor(factor: u32) {
            description("invalid upscale factor")
            display("upscale factor must be at least 1, got {}", factor)
        }
        MazeNotAssigned {
            description("maze is not assigned")
            display("maze is not assigned, create or load a maze first")
        }
        SolutionNotAssigned {
            description("solution is not assigned")
            display("solution is not assigned, solve a maze first")
        }
        CoordinateOutOfRange(what: &'static str, cell: Cell, rows: usize, columns: usize) {
            description("coordinate out of range")
            display("{} cell {} is outside of the {} x {} maze", what, cell, rows, columns)
        }
        MissingFile(path: String) {
            description("file does not exist")
            display("{} does not exist", path)
        }
        MalformedGrid(reason: String) {
            description("malformed maze grid")
            display("malformed maze grid: {}", reason)
        }
        Unsolvable(start: Cell, end: Cell) {
            description("no solution found")
            display("no path from {} to {}", start, end)
        }
    }
}
