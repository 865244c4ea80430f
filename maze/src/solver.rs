use std::collections::{HashMap, VecDeque, hash_map::Entry};
use std::fmt;

use log::{debug, trace};

use crate::grid::{Cell, Grid, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "Start"),
            Endpoint::End => write!(f, "End"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverError {
    OutOfBounds { endpoint: Endpoint, cell: Cell },
    Wall { endpoint: Endpoint, cell: Cell },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::OutOfBounds { endpoint, cell } => {
                write!(f, "{} {} is outside the maze.", endpoint, cell)
            }
            SolverError::Wall { endpoint, cell } => {
                write!(f, "{} {} is inside a wall.", endpoint, cell)
            }
        }
    }
}

impl std::error::Error for SolverError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Searching,
    Solved,
    /// The queue ran dry before the end was reached.
    Exhausted,
}

/// How a tile should be drawn while solving, from highest to lowest priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Start,
    End,
    Path,
    Visited,
    Wall,
    Open,
}

/// Finds a shortest path through a grid one step at a time, using breadth-first search.
///
/// `visited` maps each discovered cell to the cell it was first reached from; the start maps to
/// `None`. An entry is never overwritten, so walking it back from the end yields a path with the
/// fewest moves.
pub struct MazeSolver<'g> {
    grid: &'g Grid,
    start: Cell,
    end: Cell,
    queue: VecDeque<Cell>,
    visited: HashMap<Cell, Option<Cell>>,
    path: Vec<Cell>,
    outcome: Outcome,
}

impl<'g> MazeSolver<'g> {
    pub fn new(grid: &'g Grid, start: Cell, end: Cell) -> Result<Self, SolverError> {
        check_endpoint(grid, Endpoint::Start, start)?;
        check_endpoint(grid, Endpoint::End, end)?;

        Ok(MazeSolver {
            grid,
            start,
            end,
            queue: VecDeque::from([start]),
            visited: HashMap::from([(start, None)]),
            path: Vec::new(),
            outcome: Outcome::Searching,
        })
    }

    /// Solves from `(1, 1)` to `(width - 2, height - 2)`.
    pub fn corner_to_corner(grid: &'g Grid) -> Result<Self, SolverError> {
        let end = Cell::new(grid.width() - 2, grid.height() - 2);
        MazeSolver::new(grid, Cell::new(1, 1), end)
    }

    /// Expands the next cell in the queue.
    ///
    /// Returns `false` once the end is reached or the queue is empty; [`outcome`](Self::outcome)
    /// tells the two apart. Later calls keep returning `false` and change nothing.
    pub fn step(&mut self) -> bool {
        if self.outcome != Outcome::Searching {
            return false;
        }

        let Some(curr) = self.queue.pop_front() else {
            self.outcome = Outcome::Exhausted;
            debug!(
                "No path from {} to {} after visiting {} cells.",
                self.start,
                self.end,
                self.visited.len()
            );
            return false;
        };

        if curr == self.end {
            self.path = self.reconstruct_path();
            self.outcome = Outcome::Solved;
            debug!(
                "Solved {} -> {} in {} moves after visiting {} cells.",
                self.start,
                self.end,
                self.path.len() - 1,
                self.visited.len()
            );
            return false;
        }

        for next in self.grid.neighbors(curr, 1) {
            if !self.grid.is_open(next) {
                continue;
            }
            if let Entry::Vacant(entry) = self.visited.entry(next) {
                entry.insert(Some(curr));
                self.queue.push_back(next);
            }
        }
        trace!("Expanded {}, {} queued.", curr, self.queue.len());

        true
    }

    /// Steps until the search concludes. Returns the number of steps taken.
    pub fn run(&mut self) -> usize {
        let mut steps = 0;
        while self.step() {
            steps += 1;
        }
        steps
    }

    // Walks predecessors back from the end, then flips the result to run start to end.
    fn reconstruct_path(&self) -> Vec<Cell> {
        let mut path = Vec::new();
        let mut current = Some(self.end);

        while let Some(cell) = current {
            path.push(cell);
            current = self.visited.get(&cell).copied().flatten();
        }

        path.reverse();
        path
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn visited(&self) -> &HashMap<Cell, Option<Cell>> {
        &self.visited
    }

    pub fn queue(&self) -> &VecDeque<Cell> {
        &self.queue
    }

    /// The path from start to end, inclusive. Empty unless solved.
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    /// Number of moves along the path, if solved.
    pub fn distance(&self) -> Option<usize> {
        match self.outcome {
            Outcome::Solved => Some(self.path.len() - 1),
            _ => None,
        }
    }

    pub fn shade(&self, cell: Cell) -> Shade {
        if cell == self.start {
            Shade::Start
        } else if cell == self.end {
            Shade::End
        } else if self.path.contains(&cell) {
            Shade::Path
        } else if self.visited.contains_key(&cell) {
            Shade::Visited
        } else if self.grid.get(cell) == Some(Tile::Open) {
            Shade::Open
        } else {
            Shade::Wall
        }
    }
}

fn check_endpoint(grid: &Grid, endpoint: Endpoint, cell: Cell) -> Result<(), SolverError> {
    match grid.get(cell) {
        None => Err(SolverError::OutOfBounds { endpoint, cell }),
        Some(Tile::Wall) => Err(SolverError::Wall { endpoint, cell }),
        Some(Tile::Open) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maker::MazeMaker;

    fn two_carves() -> Grid {
        Grid::from_markers(&[
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 1, 1, 1],
            vec![1, 0, 1, 1, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    fn cells(coords: &[(usize, usize)]) -> Vec<Cell> {
        coords.iter().map(|&c| Cell::from(c)).collect()
    }

    #[test]
    fn test_solves_two_carve_maze() {
        let grid = two_carves();
        let mut solver = MazeSolver::new(&grid, Cell::new(1, 1), Cell::new(3, 3)).unwrap();

        solver.run();

        assert_eq!(solver.outcome(), Outcome::Solved);
        assert_eq!(
            solver.path(),
            cells(&[(1, 1), (1, 2), (1, 3), (2, 3), (3, 3)]).as_slice()
        );
        assert_eq!(solver.distance(), Some(4));
    }

    #[test]
    fn test_start_equal_to_end_solves_on_first_step() {
        let grid = two_carves();
        let mut solver = MazeSolver::new(&grid, Cell::new(1, 3), Cell::new(1, 3)).unwrap();

        assert!(!solver.step());
        assert_eq!(solver.outcome(), Outcome::Solved);
        assert_eq!(solver.path(), &[Cell::new(1, 3)]);
        assert_eq!(solver.distance(), Some(0));
    }

    #[test]
    fn test_unreachable_end_exhausts_queue() {
        let grid = Grid::from_markers(&[
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 1, 1, 1],
            vec![1, 1, 1, 1, 1],
            vec![1, 1, 1, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap();
        let mut solver = MazeSolver::new(&grid, Cell::new(1, 1), Cell::new(3, 3)).unwrap();

        assert!(solver.step(), "expanding the start finds nothing but continues");
        assert!(!solver.step());
        assert_eq!(solver.outcome(), Outcome::Exhausted);
        assert!(solver.path().is_empty());
        assert!(solver.queue().is_empty());
        assert_eq!(solver.distance(), None);
    }

    #[test]
    fn test_step_after_conclusion_changes_nothing() {
        let grid = two_carves();
        let mut solver = MazeSolver::new(&grid, Cell::new(3, 3), Cell::new(1, 1)).unwrap();
        solver.run();
        let path = solver.path().to_vec();
        let visited = solver.visited().len();

        assert!(!solver.step());
        assert!(!solver.step());
        assert_eq!(solver.path(), path.as_slice());
        assert_eq!(solver.visited().len(), visited);
        assert_eq!(solver.run(), 0);
    }

    #[test]
    fn test_rejects_bad_endpoints() {
        let grid = two_carves();

        assert_eq!(
            MazeSolver::new(&grid, Cell::new(9, 1), Cell::new(1, 1)).err(),
            Some(SolverError::OutOfBounds {
                endpoint: Endpoint::Start,
                cell: Cell::new(9, 1)
            })
        );
        assert_eq!(
            MazeSolver::new(&grid, Cell::new(1, 1), Cell::new(2, 2)).err(),
            Some(SolverError::Wall {
                endpoint: Endpoint::End,
                cell: Cell::new(2, 2)
            })
        );
        assert_eq!(
            MazeSolver::new(&grid, Cell::new(0, 0), Cell::new(1, 1)).err(),
            Some(SolverError::Wall {
                endpoint: Endpoint::Start,
                cell: Cell::new(0, 0)
            })
        );
    }

    #[test]
    fn test_queue_entries_are_always_visited() {
        let grid = MazeMaker::seeded(15, 11, Cell::new(1, 1), 5)
            .unwrap()
            .finish();
        let mut solver = MazeSolver::corner_to_corner(&grid).unwrap();

        loop {
            assert!(solver.queue().iter().all(|c| solver.visited().contains_key(c)));
            let mut seen = std::collections::HashSet::new();
            assert!(solver.queue().iter().all(|c| seen.insert(*c)));
            if !solver.step() {
                break;
            }
        }
        assert_eq!(solver.outcome(), Outcome::Solved);
    }

    #[test]
    fn test_open_room_path_is_manhattan() {
        let mut rows = vec![vec![0; 7]; 7];
        for i in 0..7 {
            rows[0][i] = 1;
            rows[6][i] = 1;
            rows[i][0] = 1;
            rows[i][6] = 1;
        }
        let grid = Grid::from_markers(&rows).unwrap();

        let mut solver = MazeSolver::new(&grid, Cell::new(1, 5), Cell::new(5, 1)).unwrap();
        solver.run();

        assert_eq!(solver.distance(), Some(8));
        for pair in solver.path().windows(2) {
            let dx = pair[0].x.abs_diff(pair[1].x);
            let dy = pair[0].y.abs_diff(pair[1].y);
            assert_eq!(dx + dy, 1, "path should move one tile at a time");
        }
    }

    #[test]
    fn test_shortest_path_for_every_pair() {
        let grid = MazeMaker::seeded(9, 7, Cell::new(1, 1), 21)
            .unwrap()
            .finish();
        let open: Vec<Cell> = grid.open_cells().collect();

        for &start in &open {
            let distances = reference_distances(&grid, start);
            for &end in &open {
                let mut solver = MazeSolver::new(&grid, start, end).unwrap();
                solver.run();
                assert_eq!(
                    solver.distance(),
                    distances.get(&end).copied(),
                    "{} -> {}",
                    start,
                    end
                );
                assert_eq!(solver.path().first(), Some(&start));
                assert_eq!(solver.path().last(), Some(&end));
            }
        }
    }

    #[test]
    fn test_shade_priority() {
        let grid = two_carves();
        let mut solver = MazeSolver::new(&grid, Cell::new(1, 1), Cell::new(1, 3)).unwrap();

        assert_eq!(solver.shade(Cell::new(1, 2)), Shade::Open);
        solver.step();
        assert_eq!(solver.shade(Cell::new(1, 2)), Shade::Visited);
        solver.run();

        assert_eq!(solver.shade(Cell::new(1, 1)), Shade::Start);
        assert_eq!(solver.shade(Cell::new(1, 3)), Shade::End);
        assert_eq!(solver.shade(Cell::new(1, 2)), Shade::Path);
        assert_eq!(solver.shade(Cell::new(2, 3)), Shade::Open, "the end is never expanded");
        assert_eq!(solver.shade(Cell::new(0, 0)), Shade::Wall);
    }

    fn reference_distances(grid: &Grid, start: Cell) -> HashMap<Cell, usize> {
        let mut distances = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);

        while let Some(cell) = queue.pop_front() {
            let d = distances[&cell];
            for next in grid.neighbors(cell, 1) {
                if grid.is_open(next) && !distances.contains_key(&next) {
                    distances.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }

        distances
    }
}
