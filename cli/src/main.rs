use std::{io, path::PathBuf, process};

use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use cli::config::{Config, parse_cell};
use cli::run::{self, Generate, Solve};
use maze::Cell;

/// Carve perfect mazes and find the shortest way through them.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Log progress to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Carve a new maze and save it.
    Generate {
        /// Odd width, border included [env: MAZE_WIDTH, default: 51]
        #[arg(long)]
        width: Option<usize>,
        /// Odd height, border included [env: MAZE_HEIGHT, default: 51]
        #[arg(long)]
        height: Option<usize>,
        /// Seed for the carve; random when omitted [env: MAZE_SEED]
        #[arg(long)]
        seed: Option<u64>,
        /// Where to save the maze [env: MAZE_FILE, default: maze.bin]
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Print the grid after every step.
        #[arg(long)]
        trace: bool,
    },
    /// Load a saved maze and find the shortest path through it.
    Solve {
        /// Maze to load [env: MAZE_FILE, default: maze.bin]
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Start as x,y [default: 1,1]
        #[arg(long, value_parser = parse_cell)]
        start: Option<Cell>,
        /// End as x,y [default: the bottom right cell]
        #[arg(long, value_parser = parse_cell)]
        end: Option<Cell>,
        /// Print the search after every step.
        #[arg(long)]
        trace: bool,
    },
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    if let Err(e) = SimpleLogger::new()
        .without_timestamps()
        .with_level(level)
        .env()
        .init()
    {
        eprintln!("Failed to initialize logger: {}.", e);
    }
}

fn main() {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut stdout = io::stdout().lock();

    let result = match args.command {
        Command::Generate {
            width,
            height,
            seed,
            out,
            trace,
        } => {
            let settings = Generate {
                width: width.unwrap_or(config.width),
                height: height.unwrap_or(config.height),
                seed: seed.or(config.seed).unwrap_or_else(rand::random),
                out: out.unwrap_or(config.file),
                trace,
            };
            run::generate(&settings, &mut stdout).map(|_| ())
        }
        Command::Solve {
            input,
            start,
            end,
            trace,
        } => {
            let settings = Solve {
                input: input.unwrap_or(config.file),
                start,
                end,
                trace,
            };
            run::solve(&settings, &mut stdout).map(|_| ())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
