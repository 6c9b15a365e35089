use serde::{Deserialize, Serialize};

use crate::models::{ActionRequest, GameSnapshot};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ClientMessage {
    #[serde(rename = "ping")]
    Ping,
    /// Fetches a game, or starts a default one when `game_id` is absent.
    #[serde(rename = "game_info")]
    GameInfo {
        #[serde(default)]
        game_id: Option<String>,
    },
    #[serde(rename = "open")]
    Open(ActionRequest),
    #[serde(rename = "flag")]
    Flag(ActionRequest),
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    #[serde(rename = "not_found")]
    NotFound,
    #[serde(rename = "out_of_bounds")]
    OutOfBounds,
    #[serde(rename = "invalid_level")]
    InvalidLevel,
    #[serde(rename = "conflict")]
    Conflict,
    #[serde(rename = "bad_request")]
    BadRequest,
    #[serde(rename = "rate_limited")]
    RateLimited,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    #[serde(rename = "pong")]
    Pong,
    #[serde(rename = "game_info")]
    GameInfo(GameSnapshot),
    #[serde(rename = "error")]
    Error { code: ErrorCode, message: String },
}
