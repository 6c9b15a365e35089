use std::fmt;

use minesweeper_common::models::Pos;
use tracing::{debug, info, instrument, warn};

use crate::{
    data::Board,
    error::Result,
    level::LevelConfig,
    logic::{FlagOutcome, RevealOutcome},
    state::{GameResult, GameState},
};

/// Opaque game identifier, assigned once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameId(String);

impl GameId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for GameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Aggregate root: one board, its level and the derived state.
///
/// Once the game is won or lost, `open` and `flag` leave it untouched.
#[derive(Clone, Debug)]
pub struct Game {
    id: GameId,
    level: LevelConfig,
    board: Board,
    state: GameState,
    version: u64,
}

impl Game {
    #[instrument(level = "trace", skip(mines), fields(game_id = %id))]
    pub fn new(id: GameId, level: LevelConfig, mines: &[Pos]) -> Result<Self> {
        let board = Board::new(&level, mines)?;
        let state = GameState::derive(&board, &level);
        info!(
            "Creating game {}: {}x{} with {} mines",
            id,
            level.width(),
            level.height(),
            level.mine_count()
        );

        Ok(Self {
            id,
            level,
            board,
            state,
            version: 0,
        })
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn level(&self) -> &LevelConfig {
        &self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Version this copy was loaded at; zero for a game never saved.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Only the in-crate repository and use cases move the version.
    ///
    /// ```compile_fail
    /// fn rewind(game: &mut minesweeper_engine::Game) {
    ///     game.set_version(0);
    /// }
    /// ```
    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    #[instrument(level = "trace", skip(self), fields(game_id = %self.id, x = pos.x, y = pos.y))]
    pub fn open(&mut self, pos: Pos) -> Result<RevealOutcome> {
        self.check_bounds(pos)?;

        if self.state.is_finished() {
            debug!("Ignoring open on finished game at ({}, {})", pos.x, pos.y);
            return Ok(RevealOutcome::Unchanged);
        }

        let outcome = self.board.reveal(pos)?;
        self.state = GameState::derive(&self.board, &self.level);

        match self.state.result() {
            GameResult::Lost => info!("Game {} lost at ({}, {})", self.id, pos.x, pos.y),
            GameResult::Won => info!("Game {} won", self.id),
            GameResult::None => {}
        }

        Ok(outcome)
    }

    #[instrument(level = "trace", skip(self), fields(game_id = %self.id, x = pos.x, y = pos.y))]
    pub fn flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        self.check_bounds(pos)?;

        if self.state.is_finished() {
            debug!("Ignoring flag on finished game at ({}, {})", pos.x, pos.y);
            return Ok(FlagOutcome::Unchanged);
        }

        let outcome = self.board.flag(pos)?;
        self.state = GameState::derive(&self.board, &self.level);
        Ok(outcome)
    }

    fn check_bounds(&self, pos: Pos) -> Result<()> {
        self.board.locate(pos).map(|_| ()).inspect_err(|_| {
            warn!(
                "Rejecting position ({}, {}) for game {}",
                pos.x, pos.y, self.id
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::CellState, error::GameError};

    fn game(width: usize, height: usize, mines: &[(usize, usize)]) -> Game {
        let level = LevelConfig::new(width, height, mines.len()).unwrap();
        let mines: Vec<Pos> = mines.iter().map(|&(x, y)| Pos::new(x, y)).collect();
        Game::new(GameId::new("test"), level, &mines).unwrap()
    }

    #[test]
    fn new_game_is_in_progress() {
        let game = game(3, 3, &[(1, 1)]);

        assert!(game.state().is_playing());
        assert_eq!(game.state().result(), GameResult::None);
        assert_eq!(game.state().remaining_mine_estimate(), 1);
        assert_eq!(game.version(), 0);
    }

    #[test]
    fn flag_updates_estimate_but_never_ends_the_game() {
        let mut game = game(2, 1, &[(0, 0)]);

        game.flag(Pos::new(0, 0)).unwrap();
        game.flag(Pos::new(1, 0)).unwrap();

        assert!(game.state().is_playing());
        assert_eq!(game.state().remaining_mine_estimate(), -1);
    }

    #[test]
    fn flag_is_ignored_after_loss() {
        let mut game = game(3, 3, &[(0, 0)]);
        game.open(Pos::new(0, 0)).unwrap();

        assert_eq!(game.flag(Pos::new(2, 2)).unwrap(), FlagOutcome::Unchanged);
        assert_eq!(
            game.board().cell(Pos::new(2, 2)).unwrap().state(),
            CellState::Hidden
        );
    }

    #[test]
    fn open_after_win_is_ignored() {
        let mut game = game(2, 1, &[(0, 0)]);
        game.open(Pos::new(1, 0)).unwrap();
        assert_eq!(game.state().result(), GameResult::Won);

        assert_eq!(
            game.open(Pos::new(0, 0)).unwrap(),
            RevealOutcome::Unchanged
        );
        assert_eq!(game.state().result(), GameResult::Won);
    }

    #[test]
    fn out_of_bounds_is_reported_even_on_finished_game() {
        let mut game = game(3, 3, &[(0, 0)]);
        game.open(Pos::new(0, 0)).unwrap();

        assert!(matches!(
            game.open(Pos::new(9, 9)),
            Err(GameError::OutOfBounds { .. })
        ));
    }
}
