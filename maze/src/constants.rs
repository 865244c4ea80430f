use crate::grid::Cell;

// Generation:
pub const GRID_SIZE: usize = 51; // Both sides. Must be odd so that cells sit on odd indices between even wall lines.
pub const START: Cell = Cell::new(1, 1);
pub const MAX_DIMENSION: usize = 4001; // Per side. Caps a grid at about sixteen million tiles.

// Persistence:
pub const FORMAT_VERSION: u8 = 1; // Bump whenever the layout of the encoded grid changes.
pub const DEFAULT_FILE: &str = "maze.bin";
