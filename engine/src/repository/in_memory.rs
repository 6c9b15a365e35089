use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::{DashMap, Entry};
use nanoid::nanoid;
use tracing::{debug, instrument, warn};

use crate::{
    logic::{Game, GameId},
    repository::{GameRepository, RepositoryError},
};

#[derive(Debug)]
struct StoredGame {
    game: Game,
    saved_at: Instant,
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameRepository {
    games: Arc<DashMap<GameId, StoredGame>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Drops games that haven't been saved for longer than `max_idle` and
    /// returns how many were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.games.len();
        self.games.retain(|id, stored| {
            let keep = stored.saved_at.elapsed() <= max_idle;
            if !keep {
                debug!("Evicting idle game {}", id);
            }
            keep
        });
        before.saturating_sub(self.games.len())
    }
}

impl GameRepository for InMemoryGameRepository {
    #[instrument(level = "trace", skip(self))]
    fn next_id(&self) -> GameId {
        let mut id_length = 5;
        let max_attempts_per_length = 10;

        loop {
            for _ in 0..max_attempts_per_length {
                let id = GameId::new(nanoid!(id_length));
                if !self.games.contains_key(&id) {
                    return id;
                }
                debug!("Game ID collision, trying another: {}", id);
            }

            warn!(
                "Exhausted ID attempts at length {}, increasing to {}",
                id_length,
                id_length + 1
            );
            id_length += 1;
        }
    }

    fn find_by_id(&self, id: &GameId) -> Result<Game, RepositoryError> {
        self.games
            .get(id)
            .map(|stored| stored.game.clone())
            .ok_or_else(|| RepositoryError::NotFound { id: id.clone() })
    }

    #[instrument(level = "trace", skip(self, game), fields(game_id = %game.id(), version = game.version()))]
    fn save(&self, game: &Game) -> Result<(), RepositoryError> {
        let mut stored = game.clone();
        stored.set_version(game.version() + 1);
        let stored = StoredGame {
            game: stored,
            saved_at: Instant::now(),
        };

        match self.games.entry(game.id().clone()) {
            Entry::Occupied(mut entry) => {
                let found = entry.get().game.version();
                if found != game.version() {
                    warn!(
                        "Rejecting stale save of game {}: loaded {}, stored {}",
                        game.id(),
                        game.version(),
                        found
                    );
                    return Err(RepositoryError::Conflict {
                        id: game.id().clone(),
                        expected: game.version(),
                        found,
                    });
                }
                entry.insert(stored);
            }
            Entry::Vacant(entry) => {
                // A loaded game whose entry vanished was evicted mid-request.
                if game.version() != 0 {
                    return Err(RepositoryError::NotFound {
                        id: game.id().clone(),
                    });
                }
                entry.insert(stored);
            }
        }

        debug!("Saved game {} at version {}", game.id(), game.version() + 1);
        Ok(())
    }
}
