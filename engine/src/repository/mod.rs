//! Persistence port for the `Game` aggregate.
//!
//! Saves are optimistic: a game is written back only if the stored revision
//! still matches the version it was loaded at. Callers that lose the race
//! reload and reapply their action.

use std::sync::Arc;

use thiserror::Error;

use crate::logic::{Game, GameId};

pub mod in_memory;

pub use in_memory::InMemoryGameRepository;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("game {id} not found")]
    NotFound { id: GameId },
    #[error("game {id} changed concurrently: loaded version {expected}, stored version {found}")]
    Conflict {
        id: GameId,
        expected: u64,
        found: u64,
    },
}

pub trait GameRepository: Send + Sync {
    /// An id no stored game currently uses.
    fn next_id(&self) -> GameId;

    fn find_by_id(&self, id: &GameId) -> Result<Game, RepositoryError>;

    /// Stores the whole aggregate, failing with `Conflict` if another save
    /// landed since `game` was loaded.
    fn save(&self, game: &Game) -> Result<(), RepositoryError>;
}

impl<R: GameRepository + ?Sized> GameRepository for Arc<R> {
    fn next_id(&self) -> GameId {
        (**self).next_id()
    }

    fn find_by_id(&self, id: &GameId) -> Result<Game, RepositoryError> {
        (**self).find_by_id(id)
    }

    fn save(&self, game: &Game) -> Result<(), RepositoryError> {
        (**self).save(game)
    }
}
