use std::{fmt, fs, io, path::Path};

use bincode::{
    config::standard,
    error::{DecodeError, EncodeError},
    serde::{decode_from_slice, encode_to_vec},
};
use serde::{Deserialize, Serialize};

use crate::{
    constants::FORMAT_VERSION,
    grid::{Grid, GridError, Tile},
};

#[derive(Serialize)]
struct GridRecordRef<'a> {
    version: u8,
    width: usize,
    height: usize,
    rows: &'a [Vec<Tile>],
}

#[derive(Deserialize)]
struct GridRecord {
    version: u8,
    width: usize,
    height: usize,
    rows: Vec<Vec<Tile>>,
}

#[derive(Debug)]
pub enum CodecError {
    Encode(EncodeError),
    Decode(DecodeError),
    Version {
        expected: u8,
        found: u8,
    },
    TrailingBytes {
        consumed: usize,
        total: usize,
    },
    DimensionMismatch {
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },
    Grid(GridError),
    Io(io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Encode(e) => write!(f, "Failed to encode maze: {}.", e),
            CodecError::Decode(e) => write!(f, "Failed to decode maze: {}.", e),
            CodecError::Version { expected, found } => write!(
                f,
                "Maze file has format version {}, expected {}.",
                found, expected
            ),
            CodecError::TrailingBytes { consumed, total } => write!(
                f,
                "Maze data ends after {} bytes but {} were given.",
                consumed, total
            ),
            CodecError::DimensionMismatch {
                width,
                height,
                found_width,
                found_height,
            } => write!(
                f,
                "Maze header says {}x{} but the tiles are {}x{}.",
                width, height, found_width, found_height
            ),
            CodecError::Grid(e) => write!(f, "Maze data is not a valid grid: {}", e),
            CodecError::Io(e) => write!(f, "Failed to access maze file: {}.", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Encode(e) => Some(e),
            CodecError::Decode(e) => Some(e),
            CodecError::Grid(e) => Some(e),
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EncodeError> for CodecError {
    fn from(e: EncodeError) -> Self {
        CodecError::Encode(e)
    }
}

impl From<DecodeError> for CodecError {
    fn from(e: DecodeError) -> Self {
        CodecError::Decode(e)
    }
}

impl From<GridError> for CodecError {
    fn from(e: GridError) -> Self {
        CodecError::Grid(e)
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        CodecError::Io(e)
    }
}

/// Serializes a grid, header first, then its tiles row by row.
pub fn encode(grid: &Grid) -> Result<Vec<u8>, CodecError> {
    let record = GridRecordRef {
        version: FORMAT_VERSION,
        width: grid.width(),
        height: grid.height(),
        rows: grid.rows(),
    };

    Ok(encode_to_vec(&record, standard())?)
}

/// Rebuilds a grid written by [`encode`].
///
/// Fails rather than truncating or padding: the header must match the tiles exactly, every byte
/// must be consumed, and the tiles must form a valid grid.
pub fn decode(bytes: &[u8]) -> Result<Grid, CodecError> {
    let (record, consumed): (GridRecord, usize) = decode_from_slice(bytes, standard())?;

    if consumed != bytes.len() {
        return Err(CodecError::TrailingBytes {
            consumed,
            total: bytes.len(),
        });
    }

    if record.version != FORMAT_VERSION {
        return Err(CodecError::Version {
            expected: FORMAT_VERSION,
            found: record.version,
        });
    }

    let found_height = record.rows.len();
    let found_width = record
        .rows
        .iter()
        .map(Vec::len)
        .find(|&len| len != record.width)
        .unwrap_or(record.width);

    if found_height != record.height || found_width != record.width {
        return Err(CodecError::DimensionMismatch {
            width: record.width,
            height: record.height,
            found_width,
            found_height,
        });
    }

    Ok(Grid::from_rows(record.rows)?)
}

pub fn save(path: impl AsRef<Path>, grid: &Grid) -> Result<(), CodecError> {
    fs::write(path, encode(grid)?)?;
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<Grid, CodecError> {
    decode(&fs::read(path)?)
}
