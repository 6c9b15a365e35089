use tracing::instrument;

use crate::{
    logic::{Game, GameId},
    repository::GameRepository,
    usecase::UseCaseError,
};

pub struct GameInfoUseCase<R> {
    repository: R,
}

impl<R: GameRepository> GameInfoUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    #[instrument(level = "trace", skip(self), fields(game_id = %id))]
    pub fn execute(&self, id: &GameId) -> Result<Game, UseCaseError> {
        Ok(self.repository.find_by_id(id)?)
    }
}
