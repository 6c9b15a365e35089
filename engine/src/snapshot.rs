use minesweeper_common::models::{self, GameSnapshot};

use crate::{
    data::{Cell, CellState},
    logic::Game,
};

impl From<CellState> for models::CellState {
    fn from(value: CellState) -> Self {
        match value {
            CellState::Hidden => Self::Hidden,
            CellState::Revealed => Self::Revealed,
            CellState::Marked => Self::Marked,
        }
    }
}

/// Unrevealed cells only show their number and mine flag once the game is
/// over, so a client can't read the layout off the wire mid-game.
fn cell_view(cell: &Cell, disclose_all: bool) -> models::Cell {
    let visible = disclose_all || cell.state() == CellState::Revealed;
    let pos = cell.pos();

    models::Cell {
        x: pos.x,
        y: pos.y,
        state: cell.state().into(),
        number: visible.then_some(cell.number()),
        mine: visible.then_some(cell.is_mine()),
    }
}

impl Game {
    pub fn snapshot(&self) -> GameSnapshot {
        let disclose_all = self.state().is_finished();

        GameSnapshot {
            game_id: self.id().to_string(),
            game_state: self.state().into(),
            board: models::Board {
                cells: self
                    .board()
                    .rows()
                    .map(|row| row.iter().map(|cell| cell_view(cell, disclose_all)).collect())
                    .collect(),
            },
            level_config: self.level().into(),
        }
    }
}

impl From<&Game> for GameSnapshot {
    fn from(value: &Game) -> Self {
        value.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use minesweeper_common::models::Pos;
    use serde_json::json;

    use super::*;
    use crate::{level::LevelConfig, logic::GameId};

    fn game() -> Game {
        let level = LevelConfig::new(3, 1, 1).unwrap();
        Game::new(GameId::new("snap"), level, &[Pos::new(2, 0)]).unwrap()
    }

    #[test]
    fn hides_unrevealed_cells_while_playing() {
        let mut game = game();
        game.open(Pos::new(1, 0)).unwrap();
        game.flag(Pos::new(2, 0)).unwrap();

        let snapshot = game.snapshot();
        let row = &snapshot.board.cells[0];

        assert_eq!(row[0].number, None);
        assert_eq!(row[0].mine, None);
        assert_eq!(row[1].number, Some(1));
        assert_eq!(row[1].mine, Some(false));
        assert_eq!(row[2].state, models::CellState::Marked);
        assert_eq!(row[2].mine, None);
    }

    #[test]
    fn discloses_everything_after_loss() {
        let mut game = game();
        game.open(Pos::new(2, 0)).unwrap();

        let snapshot = game.snapshot();
        let row = &snapshot.board.cells[0];

        assert!(!snapshot.game_state.is_playing);
        assert_eq!(snapshot.game_state.result, models::GameResult::Lost);
        assert_eq!(row[0].state, models::CellState::Hidden);
        assert_eq!(row[0].mine, Some(false));
        assert_eq!(row[0].number, Some(0));
        assert_eq!(row[2].mine, Some(true));
    }

    #[test]
    fn serialized_shape() {
        let snapshot = game().snapshot();

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "game_id": "snap",
                "game_state": {
                    "is_playing": true,
                    "result": "none",
                    "remaining_mine_estimate": 1
                },
                "board": {
                    "cells": [[
                        { "x": 0, "y": 0, "state": "hidden" },
                        { "x": 1, "y": 0, "state": "hidden" },
                        { "x": 2, "y": 0, "state": "hidden" }
                    ]]
                },
                "level_config": { "width": 3, "height": 1, "mine_count": 1 }
            })
        );
    }
}
