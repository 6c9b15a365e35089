use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Requested board shape for a new game.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct GameParams {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            width: 9,
            height: 9,
            mines: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateResponse {
    pub id: String,
}

/// Inbound request shared by `open` and `flag`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub game_id: String,
    pub x: usize,
    pub y: usize,
}

impl ActionRequest {
    pub fn new(game_id: impl Into<String>, x: usize, y: usize) -> Self {
        Self {
            game_id: game_id.into(),
            x,
            y,
        }
    }

    pub fn pos(&self) -> Pos {
        Pos::new(self.x, self.y)
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum CellState {
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "revealed")]
    Revealed,
    #[serde(rename = "marked")]
    Marked,
}

/// Client view of a single cell.
///
/// `number` and `mine` are omitted for unrevealed cells while the game is
/// still being played.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    pub state: CellState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mine: Option<bool>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum GameResult {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "won")]
    Won,
    #[serde(rename = "lost")]
    Lost,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GameState {
    pub is_playing: bool,
    pub result: GameResult,
    pub remaining_mine_estimate: i64,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    pub mine_count: usize,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    /// Rows indexed by `y`, each holding cells indexed by `x`.
    pub cells: Vec<Vec<Cell>>,
}

/// Full outbound view of one game.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub game_id: String,
    pub game_state: GameState,
    pub board: Board,
    pub level_config: LevelConfig,
}
