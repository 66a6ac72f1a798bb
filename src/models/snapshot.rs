use serde::{Deserialize, Serialize};

use super::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lobby,
    Playing,
    Ended,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Phase::Lobby => "LOBBY",
            Phase::Playing => "PLAYING",
            Phase::Ended => "ENDED",
        };
        write!(f, "{}", str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSlot {
    pub attack: Card,
    #[serde(default)]
    pub defense: Option<Card>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hand_size: usize,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub is_out: bool,
    #[serde(default)]
    pub is_host: bool,
    // Only populated for the receiving player's own entry.
    #[serde(default)]
    pub hand: Vec<Card>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailableActions {
    pub can_start: bool,
    pub can_attack: bool,
    pub can_throw: bool,
    pub can_defend: bool,
    pub can_pass: bool,
    pub can_take: bool,
    pub can_surrender: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub player_name: String,
    #[serde(default, alias = "message")]
    pub text: String,
}

/// The authoritative game state as pushed by the server. Every receipt replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub phase: Phase,
    pub max_players: u8,
    #[serde(default)]
    pub players: Vec<PlayerView>,
    #[serde(default)]
    pub table: Vec<TableSlot>,
    #[serde(default)]
    pub deck_count: usize,
    #[serde(default)]
    pub discard_count: usize,
    #[serde(default)]
    pub trump_card: Option<Card>,
    #[serde(default)]
    pub attacker_id: Option<String>,
    #[serde(default)]
    pub defender_id: Option<String>,
    #[serde(default)]
    pub loser_id: Option<String>,
    #[serde(default)]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub surrendered_player: Option<String>,
    #[serde(default)]
    pub allow_throw_ins: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub available_actions: AvailableActions,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
}

impl GameSnapshot {
    pub fn find_player(&self, player_id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Contents of the local player's hand, empty when the player is not seated here.
    pub fn own_hand(&self, player_id: Option<&str>) -> &[Card] {
        player_id
            .and_then(|id| self.find_player(id))
            .map(|p| p.hand.as_slice())
            .unwrap_or(&[])
    }

    /// Indices of table slots still waiting for a defense card.
    pub fn undefended_slots(&self) -> Vec<usize> {
        self.table
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.defense.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_defender(&self, player_id: Option<&str>) -> bool {
        match (player_id, self.defender_id.as_deref()) {
            (Some(me), Some(defender)) => me == defender,
            _ => false,
        }
    }

    pub fn trump_suit(&self) -> Option<super::card::Suit> {
        self.trump_card.map(|card| card.suit)
    }
}
