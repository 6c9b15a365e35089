//! Request orchestration: load the aggregate, apply one action, save it back.
//!
//! Every action is saved, including no-ops, so a request always produces
//! exactly one successful write. A save that loses an optimistic race is
//! retried from the load, up to `max_attempts` times.

use thiserror::Error;
use tracing::warn;

use crate::{
    error::GameError,
    logic::{Game, GameId},
    repository::{GameRepository, RepositoryError},
};

mod create;
mod flag;
mod info;
mod open;

pub use create::CreateGameUseCase;
pub use flag::FlagUseCase;
pub use info::GameInfoUseCase;
pub use open::OpenUseCase;

pub const DEFAULT_SAVE_ATTEMPTS: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    #[error("game {id} not found")]
    NotFound { id: GameId },
    #[error("game {id} kept changing concurrently, gave up after {attempts} attempts")]
    Conflict { id: GameId, attempts: usize },
    #[error(transparent)]
    Game(#[from] GameError),
}

impl From<RepositoryError> for UseCaseError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { id } => Self::NotFound { id },
            RepositoryError::Conflict { id, .. } => Self::Conflict { id, attempts: 1 },
        }
    }
}

/// The saved aggregate and what the action did to it.
#[derive(Debug, Clone)]
pub struct Applied<T> {
    pub game: Game,
    pub outcome: T,
}

fn load_apply_save<R, T>(
    repository: &R,
    id: &GameId,
    max_attempts: usize,
    mut action: impl FnMut(&mut Game) -> Result<T, GameError>,
) -> Result<Applied<T>, UseCaseError>
where
    R: GameRepository + ?Sized,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let mut game = repository.find_by_id(id)?;
        let outcome = action(&mut game)?;

        match repository.save(&game) {
            Ok(()) => {
                game.set_version(game.version() + 1);
                return Ok(Applied { game, outcome });
            }
            Err(RepositoryError::Conflict { .. }) => {
                warn!(
                    "Save conflict on game {} (attempt {}/{})",
                    id, attempt, max_attempts
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(UseCaseError::Conflict {
        id: id.clone(),
        attempts: max_attempts,
    })
}
