//! Shared types and protocol definitions for the minesweeper engine and the
//! transports that talk to its clients.

pub mod models;
pub mod protocol;
