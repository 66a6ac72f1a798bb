use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::card::Card;

/// Outbound session messages. Serialized as a JSON object tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Join {
        player_name: String,
        player_id: Option<String>,
    },
    PlayAttack {
        card: Card,
    },
    #[serde(rename_all = "camelCase")]
    PlayDefense {
        card: Card,
        attack_index: usize,
    },
    PassAttack,
    TakeCards,
    Surrender,
    StartGame,
    RequestRematch,
    CancelRematch,
    SendChat {
        message: String,
    },
}

impl Display for ClientMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ClientMessage::Join { .. } => "JOIN",
            ClientMessage::PlayAttack { .. } => "PLAY_ATTACK",
            ClientMessage::PlayDefense { .. } => "PLAY_DEFENSE",
            ClientMessage::PassAttack => "PASS_ATTACK",
            ClientMessage::TakeCards => "TAKE_CARDS",
            ClientMessage::Surrender => "SURRENDER",
            ClientMessage::StartGame => "START_GAME",
            ClientMessage::RequestRematch => "REQUEST_REMATCH",
            ClientMessage::CancelRematch => "CANCEL_REMATCH",
            ClientMessage::SendChat { .. } => "SEND_CHAT",
        };

        write!(f, "{}", str)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub max_players: u8,
}
