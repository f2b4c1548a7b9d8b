use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use shifting_maze_core::{CellState, GridError};
use shifting_maze_grid::Grid;
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "maze";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of a carved grid suitable for single-line transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MazeLayoutSnapshot {
    /// Number of rows contained in the grid.
    pub(crate) rows: u32,
    /// Number of columns contained in the grid.
    pub(crate) cols: u32,
    /// Row-major cell states.
    pub(crate) cells: Vec<CellState>,
}

impl MazeLayoutSnapshot {
    /// Captures the layout of the provided grid.
    #[must_use]
    pub(crate) fn capture(grid: &Grid) -> Self {
        Self {
            rows: grid.num_rows(),
            cols: grid.num_cols(),
            cells: grid.states().to_vec(),
        }
    }

    /// Rebuilds the grid described by the snapshot.
    pub(crate) fn into_grid(self) -> Result<Grid, LayoutTransferError> {
        Ok(Grid::from_states(self.rows, self.cols, self.cells)?)
    }

    /// Encodes the snapshot as `maze:v1:<rows>x<cols>:<payload>`.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializablePayload {
            maze_bits: pack_cells(&self.cells),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.rows, self.cols
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let segments: Vec<&str> = trimmed.splitn(4, FIELD_DELIMITER).collect();
        let [domain, version, dimensions, payload] = segments[..] else {
            return Err(LayoutTransferError::MissingSegments {
                found: segments.len(),
            });
        };
        match (domain, version) {
            (SNAPSHOT_DOMAIN, SNAPSHOT_VERSION) => {}
            (SNAPSHOT_DOMAIN, other) => {
                return Err(LayoutTransferError::UnsupportedVersion(other.to_owned()))
            }
            (other, _) => return Err(LayoutTransferError::InvalidPrefix(other.to_owned())),
        }

        let (rows, cols) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializablePayload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let count = usize::try_from(u64::from(rows) * u64::from(cols))
            .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
        let cells = unpack_cells(&decoded.maze_bits, count).ok_or(
            LayoutTransferError::TruncatedPayload {
                expected: count.div_ceil(8),
                actual: decoded.maze_bits.len(),
            },
        )?;

        Ok(Self { rows, cols, cells })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializablePayload {
    maze_bits: Vec<u8>,
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// Fewer than the four `domain:version:dimensions:payload` segments were present.
    #[error("layout string has {found} of 4 segments")]
    MissingSegments {
        /// Number of segments found.
        found: usize,
    },
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not process layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The payload holds fewer cells than the dimensions require.
    #[error("layout payload holds {actual} bytes, expected {expected}")]
    TruncatedPayload {
        /// Number of bytes implied by the dimensions.
        expected: usize,
        /// Number of bytes present in the payload.
        actual: usize,
    },
    /// The decoded cells do not describe a valid grid.
    #[error("layout does not describe a valid grid: {0}")]
    InvalidGrid(#[from] GridError),
}

/// Splits `<rows>x<cols>`; zero extents are left for [`Grid::from_states`] to reject.
fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (rows, cols) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;
    let extent = |text: &str| text.trim().parse::<u32>().map_err(|_| invalid());
    Ok((extent(rows)?, extent(cols)?))
}

fn pack_cells(cells: &[CellState]) -> Vec<u8> {
    cells
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .filter(|(_, state)| **state == CellState::Maze)
                .fold(0_u8, |byte, (bit, _)| byte | (1 << bit))
        })
        .collect()
}

fn unpack_cells(bytes: &[u8], count: usize) -> Option<Vec<CellState>> {
    if bytes.len() < count.div_ceil(8) {
        return None;
    }
    Some(
        (0..count)
            .map(|index| {
                if bytes[index / 8] & (1 << (index % 8)) != 0 {
                    CellState::Maze
                } else {
                    CellState::Wall
                }
            })
            .collect(),
    )
}
