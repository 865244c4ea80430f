use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_DIMENSION;

pub const MIN_DIMENSION: usize = 3;

// Up, down, left, right.
const DIRECTIONS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// A column/row coordinate. `(0, 0)` is the top left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Cell {
        Cell { x, y }
    }

    /// The cell halfway between `self` and `other`, i.e. the wall separating two cells that are
    /// two steps apart.
    pub fn between(self, other: Cell) -> Cell {
        Cell::new((self.x + other.x) / 2, (self.y + other.y) / 2)
    }

    pub fn offset(self, (dx, dy): (isize, isize)) -> Option<Cell> {
        Some(Cell::new(
            self.x.checked_add_signed(dx)?,
            self.y.checked_add_signed(dy)?,
        ))
    }

    fn is_odd(self) -> bool {
        self.x % 2 == 1 && self.y % 2 == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((x, y): (usize, usize)) -> Self {
        Cell::new(x, y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Variant order fixes the persisted markers: `Open` is 0, `Wall` is 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Open,
    #[default]
    Wall,
}

impl Tile {
    pub fn marker(self) -> u8 {
        match self {
            Tile::Open => 0,
            Tile::Wall => 1,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Tile::Open => "  ",
            Tile::Wall => "██",
        }
    }

    pub fn from_marker(marker: u8) -> Result<Tile, GridError> {
        match marker {
            0 => Ok(Tile::Open),
            1 => Ok(Tile::Wall),
            _ => Err(GridError::UnknownMarker { marker }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    TooSmall {
        width: usize,
        height: usize,
    },
    TooLarge {
        width: usize,
        height: usize,
    },
    EvenDimension {
        width: usize,
        height: usize,
    },
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownMarker {
        marker: u8,
    },
    MisplacedStart(Cell),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::TooSmall { width, height } => write!(
                f,
                "Grid of {}x{} is too small, both sides must be at least {}.",
                width, height, MIN_DIMENSION
            ),
            GridError::TooLarge { width, height } => write!(
                f,
                "Grid of {}x{} is too large, neither side may exceed {}.",
                width, height, MAX_DIMENSION
            ),
            GridError::EvenDimension { width, height } => write!(
                f,
                "Grid of {}x{} has an even side, both sides must be odd.",
                width, height
            ),
            GridError::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} tiles, expected {}.",
                row, found, expected
            ),
            GridError::UnknownMarker { marker } => {
                write!(f, "Unknown tile marker {}, expected 0 or 1.", marker)
            }
            GridError::MisplacedStart(cell) => write!(
                f,
                "Start {} must have odd coordinates strictly inside the border.",
                cell
            ),
        }
    }
}

impl std::error::Error for GridError {}

fn check_dimensions(width: usize, height: usize) -> Result<(), GridError> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(GridError::TooSmall { width, height });
    }

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(GridError::TooLarge { width, height });
    }

    if width % 2 == 0 || height % 2 == 0 {
        return Err(GridError::EvenDimension { width, height });
    }

    Ok(())
}

/// A rectangular grid of tiles with odd sides, stored row by row.
///
/// Walls between cells fall on even indices and cells on odd indices, so the
/// outer border is row 0, row `height - 1`, column 0 and column `width - 1`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    /// A grid of solid wall.
    pub fn new(width: usize, height: usize) -> Result<Grid, GridError> {
        check_dimensions(width, height)?;

        Ok(Grid {
            width,
            height,
            rows: vec![vec![Tile::Wall; width]; height],
        })
    }

    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Grid, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        check_dimensions(width, height)?;

        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != width)
        {
            return Err(GridError::Ragged {
                row,
                expected: width,
                found,
            });
        }

        Ok(Grid {
            width,
            height,
            rows,
        })
    }

    /// Builds a grid from rows of markers, 1 for wall and 0 for open.
    pub fn from_markers(rows: &[Vec<u8>]) -> Result<Grid, GridError> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|&m| Tile::from_marker(m)).collect())
            .collect::<Result<Vec<Vec<Tile>>, GridError>>()?;

        Grid::from_rows(rows)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    pub fn get(&self, cell: Cell) -> Option<Tile> {
        self.rows.get(cell.y)?.get(cell.x).copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Strictly inside the border.
    pub fn is_interior(&self, cell: Cell) -> bool {
        cell.x > 0 && cell.y > 0 && cell.x < self.width - 1 && cell.y < self.height - 1
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.get(cell) == Some(Tile::Open)
    }

    /// Whether `cell` can seed a carve: odd on both axes and inside the border.
    pub fn is_carvable(&self, cell: Cell) -> bool {
        cell.is_odd() && self.is_interior(cell)
    }

    pub(crate) fn open(&mut self, cell: Cell) {
        debug_assert!(self.is_interior(cell), "carving must stay inside the border");
        self.rows[cell.y][cell.x] = Tile::Open;
    }

    /// The in-bounds cells `distance` steps away along each axis, in up, down, left, right order.
    pub fn neighbors(&self, cell: Cell, distance: usize) -> impl Iterator<Item = Cell> + '_ {
        let distance = distance as isize;
        DIRECTIONS.into_iter().filter_map(move |(dx, dy)| {
            cell.offset((dx * distance, dy * distance))
                .filter(|&n| self.contains(n))
        })
    }

    pub fn cells(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &tile)| (Cell::new(x, y), tile))
        })
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells()
            .filter(|&(_, tile)| tile == Tile::Open)
            .map(|(cell, _)| cell)
    }

    pub fn open_count(&self) -> usize {
        self.open_cells().count()
    }

    pub fn border_is_wall(&self) -> bool {
        self.cells()
            .filter(|&(cell, _)| !self.is_interior(cell))
            .all(|(_, tile)| tile == Tile::Wall)
    }

    /// Draws the grid two characters per tile, one line per row.
    pub fn draw(&self, glyph: impl Fn(Cell, Tile) -> &'static str) -> String {
        self.rows
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, &tile)| glyph(Cell::new(x, y), tile))
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn log(&self) -> String {
        self.draw(|_, tile| tile.glyph())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_solid_wall() {
        let grid = Grid::new(5, 7).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 7);
        assert_eq!(grid.open_count(), 0);
        assert!(grid.border_is_wall());
    }

    #[test]
    fn test_new_rejects_small_and_even_dimensions() {
        assert_eq!(
            Grid::new(1, 5),
            Err(GridError::TooSmall {
                width: 1,
                height: 5
            })
        );
        assert_eq!(
            Grid::new(0, 0),
            Err(GridError::TooSmall {
                width: 0,
                height: 0
            })
        );
        assert_eq!(
            Grid::new(5, 6),
            Err(GridError::EvenDimension {
                width: 5,
                height: 6
            })
        );
    }

    #[test]
    fn test_new_rejects_huge_dimensions() {
        assert_eq!(
            Grid::new(usize::MAX, 3),
            Err(GridError::TooLarge {
                width: usize::MAX,
                height: 3
            })
        );
        assert_eq!(
            Grid::new(3, MAX_DIMENSION + 2),
            Err(GridError::TooLarge {
                width: 3,
                height: MAX_DIMENSION + 2
            })
        );
        assert!(Grid::new(MAX_DIMENSION, 3).is_ok());
    }

    #[test]
    fn test_from_markers_rejects_ragged_rows() {
        let rows = vec![vec![1, 1, 1], vec![1, 0], vec![1, 1, 1]];
        assert_eq!(
            Grid::from_markers(&rows),
            Err(GridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_from_markers_rejects_unknown_marker() {
        let rows = vec![vec![1, 1, 1], vec![1, 7, 1], vec![1, 1, 1]];
        assert_eq!(
            Grid::from_markers(&rows),
            Err(GridError::UnknownMarker { marker: 7 })
        );
    }

    #[test]
    fn test_neighbors_stay_in_bounds() {
        let grid = Grid::new(5, 5).unwrap();

        let corner: Vec<Cell> = grid.neighbors(Cell::new(0, 0), 1).collect();
        assert_eq!(corner, vec![Cell::new(0, 1), Cell::new(1, 0)]);

        let far: Vec<Cell> = grid.neighbors(Cell::new(1, 1), 2).collect();
        assert_eq!(far, vec![Cell::new(1, 3), Cell::new(3, 1)]);
    }

    #[test]
    fn test_between_is_the_separating_wall() {
        assert_eq!(Cell::new(1, 1).between(Cell::new(3, 1)), Cell::new(2, 1));
        assert_eq!(Cell::new(3, 3).between(Cell::new(3, 1)), Cell::new(3, 2));
    }

    #[test]
    fn test_is_carvable() {
        let grid = Grid::new(5, 5).unwrap();
        assert!(grid.is_carvable(Cell::new(1, 1)));
        assert!(grid.is_carvable(Cell::new(3, 3)));
        assert!(!grid.is_carvable(Cell::new(2, 1)));
        assert!(!grid.is_carvable(Cell::new(5, 1)));
    }

    #[test]
    fn test_log_draws_walls_and_spaces() {
        let grid = Grid::from_markers(&[vec![1, 1, 1], vec![1, 0, 1], vec![1, 1, 1]]).unwrap();
        assert_eq!(grid.log(), "██████\n██  ██\n██████");
        assert_eq!(grid.to_string(), grid.log());

        let marked = grid.draw(|cell, tile| {
            if cell == Cell::new(1, 1) {
                "@@"
            } else {
                tile.glyph()
            }
        });
        assert_eq!(marked, "██████\n██@@██\n██████");
    }

    #[test]
    fn test_border_is_wall_detects_open_border() {
        let grid = Grid::from_markers(&[vec![1, 0, 1], vec![1, 0, 1], vec![1, 1, 1]]).unwrap();
        assert!(!grid.border_is_wall());
    }
}
