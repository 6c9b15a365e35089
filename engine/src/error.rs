use minesweeper_common::models::Pos;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("position ({}, {}) is outside the {width}x{height} board", .pos.x, .pos.y)]
    OutOfBounds { pos: Pos, width: usize, height: usize },
    #[error("invalid level {width}x{height} with {mines} mines")]
    InvalidLevel {
        width: usize,
        height: usize,
        mines: usize,
    },
    #[error("mine placed twice at ({}, {})", .0.x, .0.y)]
    DuplicateMine(Pos),
    #[error("level expects {expected} mines but {actual} were placed")]
    MineCountMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, GameError>;
