use minesweeper_common::models::{self, GameParams};

use crate::error::{GameError, Result};

/// Board dimensions and mine count, fixed for the lifetime of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    width: usize,
    height: usize,
    mine_count: usize,
}

impl LevelConfig {
    pub const BEGINNER: Self = Self::new_unchecked(9, 9, 10);
    pub const INTERMEDIATE: Self = Self::new_unchecked(16, 16, 40);
    pub const EXPERT: Self = Self::new_unchecked(30, 16, 99);

    /// Largest board `new` accepts.
    pub const MAX_CELLS: usize = 1_000_000;

    const fn new_unchecked(width: usize, height: usize, mine_count: usize) -> Self {
        Self {
            width,
            height,
            mine_count,
        }
    }

    /// Requires a non-empty board of at most [`Self::MAX_CELLS`] cells with
    /// at least one mine and at least one safe cell.
    pub fn new(width: usize, height: usize, mine_count: usize) -> Result<Self> {
        Self::with_max_cells(width, height, mine_count, Self::MAX_CELLS)
    }

    /// Like [`Self::new`] with a tighter cell limit. Limits above
    /// [`Self::MAX_CELLS`] are clamped to it.
    pub fn with_max_cells(
        width: usize,
        height: usize,
        mine_count: usize,
        max_cells: usize,
    ) -> Result<Self> {
        let invalid = GameError::InvalidLevel {
            width,
            height,
            mines: mine_count,
        };
        let cells = width.checked_mul(height).ok_or(invalid.clone())?;

        if cells > max_cells.min(Self::MAX_CELLS) {
            return Err(invalid);
        }
        if width == 0 || height == 0 || mine_count == 0 || mine_count >= cells {
            return Err(invalid);
        }

        Ok(Self::new_unchecked(width, height, mine_count))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }

    pub fn safe_cells(&self) -> usize {
        self.total_cells() - self.mine_count
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::BEGINNER
    }
}

impl TryFrom<GameParams> for LevelConfig {
    type Error = GameError;

    fn try_from(params: GameParams) -> Result<Self> {
        Self::new(params.width, params.height, params.mines)
    }
}

impl From<&LevelConfig> for models::LevelConfig {
    fn from(value: &LevelConfig) -> Self {
        Self {
            width: value.width,
            height: value.height,
            mine_count: value.mine_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_levels_without_a_safe_cell_or_mine() {
        assert!(LevelConfig::new(3, 3, 9).is_err());
        assert!(LevelConfig::new(3, 3, 0).is_err());
        assert!(LevelConfig::new(0, 3, 1).is_err());
        assert!(LevelConfig::new(usize::MAX, 2, 1).is_err());
    }

    #[test]
    fn rejects_oversized_boards() {
        assert!(LevelConfig::new(1 << 20, 1 << 20, 1).is_err());
        assert!(LevelConfig::new(LevelConfig::MAX_CELLS + 1, 1, 1).is_err());
        assert!(LevelConfig::new(1000, 1000, 1).is_ok());

        assert!(LevelConfig::with_max_cells(30, 16, 99, 400).is_err());
        assert!(LevelConfig::with_max_cells(20, 20, 99, 400).is_ok());
        assert!(LevelConfig::with_max_cells(2000, 1000, 1, usize::MAX).is_err());
    }

    #[test]
    fn default_params_map_to_beginner() {
        let level = LevelConfig::try_from(GameParams::default()).unwrap();

        assert_eq!(level, LevelConfig::BEGINNER);
        assert_eq!(level.safe_cells(), 71);
    }
}
