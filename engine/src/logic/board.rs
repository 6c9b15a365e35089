use minesweeper_common::models::Pos;
use tracing::{debug, instrument};

use crate::{
    data::{Board, Cell, CellState},
    error::{GameError, Result},
    level::LevelConfig,
    logic::{FlagOutcome, RevealOutcome},
};

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Board {
    /// Lays out the grid and fixes every cell's adjacency number.
    ///
    /// `mines` must hold exactly `level.mine_count()` distinct in-bounds
    /// positions.
    #[instrument(level = "trace", skip(mines))]
    pub fn new(level: &LevelConfig, mines: &[Pos]) -> Result<Self> {
        if mines.len() != level.mine_count() {
            return Err(GameError::MineCountMismatch {
                expected: level.mine_count(),
                actual: mines.len(),
            });
        }

        let (width, height) = (level.width(), level.height());
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Pos::new(x, y))))
            .collect();

        let mut board = Self {
            width,
            height,
            cells,
            hidden_safe_cells: level.safe_cells(),
            marked_cells: 0,
            detonated: None,
        };

        for &pos in mines {
            let index = board.locate(pos)?;
            let cell = &mut board.cells[index];
            if cell.mine {
                return Err(GameError::DuplicateMine(pos));
            }
            cell.mine = true;
        }

        for index in 0..board.cells.len() {
            if board.cells[index].mine {
                continue;
            }
            let number = board
                .neighbors(board.cells[index].pos)
                .filter(|&neighbor| board.cells[board.index(neighbor)].mine)
                .count();
            board.cells[index].number = number as u8;
        }

        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn hidden_safe_cells(&self) -> usize {
        self.hidden_safe_cells
    }

    pub fn marked_cells(&self) -> usize {
        self.marked_cells
    }

    /// The mine that ended the game, if one was revealed.
    pub fn detonated(&self) -> Option<Pos> {
        self.detonated
    }

    pub fn all_safe_revealed(&self) -> bool {
        self.hidden_safe_cells == 0
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn cell(&self, pos: Pos) -> Result<&Cell> {
        let index = self.locate(pos)?;
        Ok(&self.cells[index])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Reveals a hidden cell, flooding outwards through zero-numbered cells.
    ///
    /// Revealed and marked cells are left alone, both at the target and
    /// during the flood.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn reveal(&mut self, pos: Pos) -> Result<RevealOutcome> {
        let index = self.locate(pos)?;
        let cell = &mut self.cells[index];

        if cell.state != CellState::Hidden {
            debug!("Ignoring reveal on {:?} cell ({}, {})", cell.state, pos.x, pos.y);
            return Ok(RevealOutcome::Unchanged);
        }

        cell.set_state(CellState::Revealed);
        if cell.mine {
            self.detonated = Some(pos);
            return Ok(RevealOutcome::HitMine(pos));
        }

        let number = cell.number;
        self.hidden_safe_cells -= 1;
        let mut revealed = vec![pos];
        let mut pending = Vec::new();
        if number == 0 {
            pending.push(pos);
        }

        // Neighbours of a zero cell are never mines, and a cell only enters
        // `pending` on its Hidden -> Revealed transition.
        while let Some(current) = pending.pop() {
            for neighbor in self.neighbors(current) {
                let index = self.index(neighbor);
                let cell = &mut self.cells[index];
                if cell.state != CellState::Hidden {
                    continue;
                }

                cell.set_state(CellState::Revealed);
                self.hidden_safe_cells -= 1;
                revealed.push(neighbor);

                if cell.number == 0 {
                    pending.push(neighbor);
                }
            }
        }

        debug!(
            "Revealed {} cells, {} safe cells still hidden",
            revealed.len(),
            self.hidden_safe_cells
        );
        Ok(RevealOutcome::Revealed(revealed))
    }

    /// Toggles a mark on a hidden or marked cell. Revealed cells can't be
    /// marked.
    #[instrument(level = "trace", skip(self), fields(x = pos.x, y = pos.y))]
    pub fn flag(&mut self, pos: Pos) -> Result<FlagOutcome> {
        let index = self.locate(pos)?;
        let cell = &mut self.cells[index];

        let next = match cell.state {
            CellState::Revealed => {
                debug!("Ignoring flag on revealed cell ({}, {})", pos.x, pos.y);
                return Ok(FlagOutcome::Unchanged);
            }
            CellState::Hidden => {
                self.marked_cells += 1;
                CellState::Marked
            }
            CellState::Marked => {
                self.marked_cells -= 1;
                CellState::Hidden
            }
        };

        cell.set_state(next);
        Ok(FlagOutcome::Toggled(next))
    }

    fn index(&self, pos: Pos) -> usize {
        pos.x + pos.y * self.width
    }

    pub(crate) fn locate(&self, pos: Pos) -> Result<usize> {
        if self.contains(pos) {
            Ok(self.index(pos))
        } else {
            Err(GameError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width, self.height);
        DISPLACEMENTS.into_iter().filter_map(move |(dx, dy)| {
            let x = pos.x.checked_add_signed(dx)?;
            let y = pos.y.checked_add_signed(dy)?;
            (x < width && y < height).then_some(Pos::new(x, y))
        })
    }
}
