use thiserror::Error;

use crate::config::BoardSize;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// Requested board dimension falls outside the playable range.
    #[error(
        "board size {0} is out of range ({min}..={max})",
        min = BoardSize::MIN,
        max = BoardSize::MAX
    )]
    InvalidBoardSize(usize),

    #[error("cell ({row}, {col}) is outside a {size}x{size} grid")]
    OutOfBounds { row: i64, col: i64, size: usize },
}
