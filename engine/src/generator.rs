use minesweeper_common::models::Pos;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::level::LevelConfig;

/// Supplies mine positions for a new game.
///
/// Implementations must return exactly `level.mine_count()` distinct,
/// in-bounds positions; `Game::new` rejects anything else.
pub trait MineInitializer: Send + Sync {
    fn place(&self, level: &LevelConfig) -> Vec<Pos>;
}

/// Uniformly random layout. A seed makes the layout reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMines {
    seed: Option<u64>,
}

impl RandomMines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl MineInitializer for RandomMines {
    fn place(&self, level: &LevelConfig) -> Vec<Pos> {
        match self.seed {
            Some(seed) => place_randomly(level, &mut StdRng::seed_from_u64(seed)),
            None => place_randomly(level, &mut rand::rng()),
        }
    }
}

// Selection sampling: each cell is picked with probability
// mines_left / cells_left, which yields exactly `mine_count` mines.
// Sampling in `usize` keeps boards of any accepted size exact.
fn place_randomly<R: Rng + ?Sized>(level: &LevelConfig, rng: &mut R) -> Vec<Pos> {
    let mut mines = Vec::with_capacity(level.mine_count());
    let mut mines_left = level.mine_count();
    let total = level.total_cells();

    for index in 0..total {
        let cells_left = total - index;
        if rng.random_range(0..cells_left) < mines_left {
            mines.push(Pos::new(index % level.width(), index / level.width()));
            mines_left -= 1;
        }
    }

    debug!("Placed {} mines on {} cells", mines.len(), total);
    mines
}

/// A predetermined layout.
#[derive(Debug, Clone, Default)]
pub struct FixedMines(Vec<Pos>);

impl FixedMines {
    pub fn new(mines: impl IntoIterator<Item = Pos>) -> Self {
        Self(mines.into_iter().collect())
    }
}

impl MineInitializer for FixedMines {
    fn place(&self, _level: &LevelConfig) -> Vec<Pos> {
        self.0.clone()
    }
}
