pub mod codec;
pub mod constants;
pub mod grid;
pub mod maker;
pub mod solver;

pub use codec::CodecError;
pub use grid::{Cell, Grid, GridError, Tile};
pub use maker::{MazeMaker, Pick};
pub use solver::{MazeSolver, Outcome, Shade, SolverError};
