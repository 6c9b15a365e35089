use minesweeper_common::models::Pos;

use crate::data::CellState;

mod board;
mod game;

pub use game::{Game, GameId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The cell was already revealed or marked, or the game is over.
    Unchanged,
    /// Every cell opened by this call, starting with the target.
    Revealed(Vec<Pos>),
    HitMine(Pos),
}

impl RevealOutcome {
    pub fn has_update(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Unchanged,
    Toggled(CellState),
}

impl FlagOutcome {
    pub fn has_update(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}
