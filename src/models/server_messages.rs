use serde::Deserialize;
use std::fmt::Display;

use super::snapshot::GameSnapshot;

/// Inbound session messages, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Joined { player_id: String, game_id: String },
    GameState { game: Box<GameSnapshot> },
    Error { message: String },
}

impl ServerMessage {
    pub const TAGS: [&'static str; 3] = ["joined", "game_state", "error"];
}

impl Display for ServerMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ServerMessage::Joined { .. } => "JOINED",
            ServerMessage::GameState { .. } => "GAME_STATE",
            ServerMessage::Error { .. } => "ERROR",
        };

        write!(f, "{}", str)
    }
}
