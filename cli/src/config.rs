use std::{env, fmt, path::PathBuf, str::FromStr};

use maze::Cell;
use maze::constants::{DEFAULT_FILE, GRID_SIZE};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub seed: Option<u64>,
    pub file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: GRID_SIZE,
            height: GRID_SIZE,
            seed: None,
            file: PathBuf::from(DEFAULT_FILE),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Invalid { var: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { var, value } => {
                write!(f, "Environment variable {} has invalid value '{}'.", var, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Reads `MAZE_WIDTH`, `MAZE_HEIGHT`, `MAZE_SEED` and `MAZE_FILE`, after loading `.env` if
    /// there is one. Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Config::default();

        Ok(Config {
            width: parse_var(&lookup, "MAZE_WIDTH")?.unwrap_or(default.width),
            height: parse_var(&lookup, "MAZE_HEIGHT")?.unwrap_or(default.height),
            seed: parse_var(&lookup, "MAZE_SEED")?.or(default.seed),
            file: lookup("MAZE_FILE")
                .map(PathBuf::from)
                .unwrap_or(default.file),
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => Err(ConfigError::Invalid { var, value }),
        },
    }
}

/// Parses `x,y` into a cell.
pub fn parse_cell(input: &str) -> Result<Cell, String> {
    let (x, y) = input
        .split_once(',')
        .ok_or_else(|| format!("Cell must look like x,y, got '{}'", input))?;

    let x = x
        .trim()
        .parse()
        .map_err(|_| format!("Invalid column in '{}'", input))?;
    let y = y
        .trim()
        .parse()
        .map_err(|_| format!("Invalid row in '{}'", input))?;

    Ok(Cell::new(x, y))
}
