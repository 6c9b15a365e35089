use minesweeper_common::models;

use crate::{data::Board, level::LevelConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GameResult {
    #[default]
    None,
    Won,
    Lost,
}

/// Play status derived from the board after every action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameState {
    is_playing: bool,
    result: GameResult,
    remaining_mine_estimate: i64,
}

impl GameState {
    /// A detonated mine loses the game, otherwise revealing every safe cell
    /// wins it.
    pub fn derive(board: &Board, level: &LevelConfig) -> Self {
        let result = if board.detonated().is_some() {
            GameResult::Lost
        } else if board.all_safe_revealed() {
            GameResult::Won
        } else {
            GameResult::None
        };

        Self {
            is_playing: result == GameResult::None,
            result,
            remaining_mine_estimate: level.mine_count() as i64 - board.marked_cells() as i64,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_finished(&self) -> bool {
        !self.is_playing
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    /// Mines minus marks; negative once the player marks more cells than
    /// there are mines.
    pub fn remaining_mine_estimate(&self) -> i64 {
        self.remaining_mine_estimate
    }
}

impl From<GameResult> for models::GameResult {
    fn from(value: GameResult) -> Self {
        match value {
            GameResult::None => Self::None,
            GameResult::Won => Self::Won,
            GameResult::Lost => Self::Lost,
        }
    }
}

impl From<&GameState> for models::GameState {
    fn from(value: &GameState) -> Self {
        Self {
            is_playing: value.is_playing,
            result: value.result.into(),
            remaining_mine_estimate: value.remaining_mine_estimate,
        }
    }
}
