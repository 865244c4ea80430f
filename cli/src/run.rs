use std::{fmt, io, io::Write, path::PathBuf};

use log::info;
use maze::constants::START;
use maze::{Cell, CodecError, GridError, MazeMaker, MazeSolver, Outcome, SolverError, codec};

use crate::render;

#[derive(Debug)]
pub enum CliError {
    Grid(GridError),
    Solver(SolverError),
    Codec(CodecError),
    Io(io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Grid(e) => write!(f, "{}", e),
            CliError::Solver(e) => write!(f, "{}", e),
            CliError::Codec(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "Failed to write output: {}.", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        CliError::Grid(e)
    }
}

impl From<SolverError> for CliError {
    fn from(e: SolverError) -> Self {
        CliError::Solver(e)
    }
}

impl From<CodecError> for CliError {
    fn from(e: CodecError) -> Self {
        CliError::Codec(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

pub struct Generate {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub out: PathBuf,
    /// Print the grid after every step.
    pub trace: bool,
}

#[derive(Debug, PartialEq)]
pub struct GenerateReport {
    pub steps: usize,
    pub carved: usize,
}

pub struct Solve {
    pub input: PathBuf,
    pub start: Option<Cell>,
    pub end: Option<Cell>,
    /// Print the search after every step.
    pub trace: bool,
}

#[derive(Debug, PartialEq)]
pub struct SolveReport {
    pub outcome: Outcome,
    pub steps: usize,
    pub visited: usize,
    pub distance: Option<usize>,
}

/// Carves a maze to completion, saves it, and prints it.
pub fn generate(settings: &Generate, out: &mut dyn Write) -> Result<GenerateReport, CliError> {
    let mut maker = MazeMaker::seeded(settings.width, settings.height, START, settings.seed)?;

    let mut steps = 0;
    while maker.step() {
        steps += 1;
        if settings.trace {
            writeln!(out, "{}\n", render::generation(&maker))?;
        }
    }

    codec::save(&settings.out, maker.grid())?;
    info!(
        "Saved {}x{} maze to {}.",
        settings.width,
        settings.height,
        settings.out.display()
    );

    writeln!(out, "{}", render::generation(&maker))?;
    writeln!(
        out,
        "Seed: {}. Carved {} passages in {} steps. Saved to {}.",
        settings.seed,
        maker.carved(),
        steps,
        settings.out.display()
    )?;

    Ok(GenerateReport {
        steps,
        carved: maker.carved(),
    })
}

/// Loads a saved maze, searches it, and prints the result. Without explicit endpoints the search
/// runs corner to corner.
pub fn solve(settings: &Solve, out: &mut dyn Write) -> Result<SolveReport, CliError> {
    let grid = codec::load(&settings.input)?;
    info!(
        "Loaded {}x{} maze from {}.",
        grid.width(),
        grid.height(),
        settings.input.display()
    );

    let start = settings.start.unwrap_or(START);
    let end = settings
        .end
        .unwrap_or(Cell::new(grid.width() - 2, grid.height() - 2));

    let mut solver = MazeSolver::new(&grid, start, end)?;

    let mut steps = 0;
    while solver.step() {
        steps += 1;
        if settings.trace {
            writeln!(out, "{}\n", render::solution(&solver))?;
        }
    }

    writeln!(out, "{}", render::solution(&solver))?;
    match solver.distance() {
        Some(distance) => writeln!(
            out,
            "Path from {} to {}: {} moves. Visited {} tiles in {} steps.",
            start,
            end,
            distance,
            solver.visited().len(),
            steps
        )?,
        None => writeln!(
            out,
            "No path from {} to {}. Visited {} tiles in {} steps.",
            start,
            end,
            solver.visited().len(),
            steps
        )?,
    }

    Ok(SolveReport {
        outcome: solver.outcome(),
        steps,
        visited: solver.visited().len(),
        distance: solver.distance(),
    })
}
