use minesweeper_common::models::ActionRequest;
use tracing::{debug, instrument};

use crate::{
    logic::{GameId, RevealOutcome},
    repository::GameRepository,
    usecase::{Applied, DEFAULT_SAVE_ATTEMPTS, UseCaseError, load_apply_save},
};

pub struct OpenUseCase<R> {
    repository: R,
    max_attempts: usize,
}

impl<R: GameRepository> OpenUseCase<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            max_attempts: DEFAULT_SAVE_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[instrument(level = "trace", skip(self), fields(game_id = %request.game_id, x = request.x, y = request.y))]
    pub fn execute(&self, request: &ActionRequest) -> Result<Applied<RevealOutcome>, UseCaseError> {
        let id = GameId::new(request.game_id.as_str());
        let applied = load_apply_save(&self.repository, &id, self.max_attempts, |game| {
            game.open(request.pos())
        })?;

        if !applied.outcome.has_update() {
            debug!(
                "Open at ({}, {}) left game {} unchanged",
                request.x, request.y, id
            );
        }
        Ok(applied)
    }
}
