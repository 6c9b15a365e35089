use minesweeper_common::models::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Hidden,
    Revealed,
    Marked,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub(crate) pos: Pos,
    pub(crate) mine: bool,
    /// Mines among the up to eight neighbours; fixed at board construction.
    pub(crate) number: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub(crate) fn new(pos: Pos) -> Self {
        Self {
            pos,
            mine: false,
            number: 0,
            state: CellState::Hidden,
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn is_mine(&self) -> bool {
        self.mine
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: CellState) {
        self.state = state;
    }
}

/// Grid of cells stored row-major (`x + y * width`), plus the counters the
/// game state is derived from.
///
/// `hidden_safe_cells` always equals the number of safe cells that are not
/// revealed and `marked_cells` the number of marked cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) cells: Vec<Cell>,
    pub(crate) hidden_safe_cells: usize,
    pub(crate) marked_cells: usize,
    pub(crate) detonated: Option<Pos>,
}
