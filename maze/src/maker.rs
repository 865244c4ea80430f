use log::{debug, trace};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::grid::{Cell, Grid, GridError};

/// A uniform choice among `len` candidates.
///
/// Every [`Rng`] is a `Pick`, so a seeded generator can be handed straight to [`MazeMaker`].
/// Tests can script the choices instead.
pub trait Pick {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> Pick for R {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Carves a perfect maze one step at a time, using depth-first search with backtracking.
///
/// The stack holds the path from the start to the cursor. Each [`step`](MazeMaker::step) either
/// carves into a random unvisited cell two steps from the cursor or, if there is none, backtracks.
/// The maze is finished when the stack is empty.
pub struct MazeMaker<P: Pick> {
    grid: Grid,
    stack: Vec<Cell>,
    picker: P,
    carved: usize,
}

impl MazeMaker<StdRng> {
    pub fn seeded(width: usize, height: usize, start: Cell, seed: u64) -> Result<Self, GridError> {
        MazeMaker::new(width, height, start, StdRng::seed_from_u64(seed))
    }
}

impl<P: Pick> MazeMaker<P> {
    pub fn new(width: usize, height: usize, start: Cell, picker: P) -> Result<Self, GridError> {
        let mut grid = Grid::new(width, height)?;
        if !grid.is_carvable(start) {
            return Err(GridError::MisplacedStart(start));
        }
        grid.open(start);

        Ok(MazeMaker {
            grid,
            stack: vec![start],
            picker,
            carved: 0,
        })
    }

    /// Advances generation by one carve or one backtrack.
    ///
    /// Returns `false` once the stack is exhausted, and keeps returning `false` without touching
    /// the grid on every later call.
    ///
    /// # Panics
    ///
    /// Panics if the picker returns an index outside `0..len`.
    pub fn step(&mut self) -> bool {
        let Some(&curr) = self.stack.last() else {
            return false;
        };

        let neighbors = self.get_neighbors(curr);

        if neighbors.is_empty() {
            self.stack.pop();
            trace!("Backtracked from {}.", curr);
            if self.stack.is_empty() {
                debug!(
                    "Generation finished: {} carves, {} open tiles.",
                    self.carved,
                    self.grid.open_count()
                );
            }
        } else {
            let next = neighbors[self.picker.pick(neighbors.len())];
            self.remove_wall_between(curr, next);
            self.visit_cell(next);
            self.stack.push(next);
            self.carved += 1;
            trace!("Carved {} -> {}.", curr, next);
        }

        true
    }

    /// Steps until generation finishes. Returns the number of steps taken.
    pub fn run(&mut self) -> usize {
        let mut steps = 0;
        while self.step() {
            steps += 1;
        }
        steps
    }

    /// Runs to completion and hands over the finished grid.
    pub fn finish(mut self) -> Grid {
        self.run();
        self.grid
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The cell being carved from, if generation is still running.
    pub fn cursor(&self) -> Option<Cell> {
        self.stack.last().copied()
    }

    pub fn stack(&self) -> &[Cell] {
        &self.stack
    }

    /// Number of passages carved so far.
    pub fn carved(&self) -> usize {
        self.carved
    }

    pub fn is_done(&self) -> bool {
        self.stack.is_empty()
    }

    // Unvisited cells two steps away, strictly inside the border.
    fn get_neighbors(&self, cell: Cell) -> Vec<Cell> {
        self.grid
            .neighbors(cell, 2)
            .filter(|&n| self.grid.is_interior(n) && !self.is_visited(n))
            .collect()
    }

    fn visit_cell(&mut self, cell: Cell) {
        self.grid.open(cell);
    }

    fn is_visited(&self, cell: Cell) -> bool {
        self.grid.is_open(cell)
    }

    fn remove_wall_between(&mut self, cell_1: Cell, cell_2: Cell) {
        self.grid.open(cell_1.between(cell_2));
    }
}
