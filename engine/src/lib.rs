//! Server-authoritative minesweeper rules.
//!
//! The [`Game`] aggregate owns a [`Board`] and derives its [`GameState`]
//! after every action. Transports talk to it through the use cases in
//! [`usecase`], which load a game from a [`GameRepository`], apply one
//! action and save the result.

pub mod data;
pub mod error;
pub mod generator;
pub mod level;
pub mod logic;
pub mod repository;
pub mod snapshot;
pub mod state;
pub mod usecase;

pub use data::{Board, Cell, CellState};
pub use error::{GameError, Result};
pub use generator::{FixedMines, MineInitializer, RandomMines};
pub use level::LevelConfig;
pub use logic::{FlagOutcome, Game, GameId, RevealOutcome};
pub use repository::{GameRepository, InMemoryGameRepository, RepositoryError};
pub use state::{GameResult, GameState};
pub use usecase::{
    Applied, CreateGameUseCase, FlagUseCase, GameInfoUseCase, OpenUseCase, UseCaseError,
};
