use tracing::{info, instrument, warn};

use crate::{
    generator::MineInitializer,
    level::LevelConfig,
    logic::Game,
    repository::{GameRepository, RepositoryError},
    usecase::{DEFAULT_SAVE_ATTEMPTS, UseCaseError},
};

/// Starts a new game: fresh id, mines from the initializer, first save.
pub struct CreateGameUseCase<R, M> {
    repository: R,
    initializer: M,
    max_attempts: usize,
}

impl<R: GameRepository, M: MineInitializer> CreateGameUseCase<R, M> {
    pub fn new(repository: R, initializer: M) -> Self {
        Self {
            repository,
            initializer,
            max_attempts: DEFAULT_SAVE_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[instrument(level = "trace", skip(self))]
    pub fn execute(&self, level: LevelConfig) -> Result<Game, UseCaseError> {
        let mines = self.initializer.place(&level);
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let mut game = Game::new(self.repository.next_id(), level, &mines)?;

            match self.repository.save(&game) {
                Ok(()) => {
                    game.set_version(game.version() + 1);
                    info!("Stored new game {}", game.id());
                    return Ok(game);
                }
                // Another request claimed the same id between next_id and save.
                Err(RepositoryError::Conflict { id, .. }) if attempt < max_attempts => {
                    warn!(
                        "Id {} taken while creating game (attempt {}/{})",
                        id, attempt, max_attempts
                    );
                }
                Err(RepositoryError::Conflict { id, .. }) => {
                    return Err(UseCaseError::Conflict { id, attempts: attempt });
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use minesweeper_common::models::Pos;

    use super::*;
    use crate::{
        error::GameError,
        generator::{FixedMines, RandomMines},
        repository::InMemoryGameRepository,
        usecase::tests::ContendedRepository,
    };

    #[test]
    fn creates_and_stores_a_playable_game() {
        let repo = InMemoryGameRepository::new();
        let create = CreateGameUseCase::new(repo.clone(), RandomMines::seeded(1));

        let game = create.execute(LevelConfig::BEGINNER).unwrap();

        assert!(game.state().is_playing());
        assert_eq!(game.version(), 1);
        assert_eq!(repo.find_by_id(game.id()).unwrap().version(), 1);
    }

    #[test]
    fn rejects_initializer_output_that_does_not_fit_the_level() {
        let repo = InMemoryGameRepository::new();
        let create = CreateGameUseCase::new(repo.clone(), FixedMines::new([Pos::new(0, 0)]));

        let err = create
            .execute(LevelConfig::new(3, 3, 2).unwrap())
            .unwrap_err();

        assert_eq!(
            err,
            UseCaseError::Game(GameError::MineCountMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(repo.is_empty());
    }

    #[test]
    fn retries_when_the_id_is_taken() {
        let repo = ContendedRepository::new(InMemoryGameRepository::new(), 1);
        let create = CreateGameUseCase::new(repo, FixedMines::new([Pos::new(1, 1)]));

        let game = create.execute(LevelConfig::new(3, 3, 1).unwrap()).unwrap();

        assert_eq!(create.repository.inner.len(), 1);
        assert_eq!(create.repository.saves.load(Ordering::SeqCst), 1);
        assert!(create.repository.inner.find_by_id(game.id()).is_ok());
    }
}
