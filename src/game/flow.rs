use reqwest::Url;

use crate::logger;
use crate::models::card::Card;
use crate::models::client_requests::ClientMessage;
use crate::models::snapshot::{GameSnapshot, Phase};
use crate::utils::errors::FlowError;

/// Two-step defense: pick a hand card, then pick the attack it beats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DefenseFlow {
    #[default]
    Idle,
    CardChosen { card: Card, targets: Vec<usize> },
}

impl DefenseFlow {
    /// Enters `CardChosen` with every undefended slot as a target.
    ///
    /// # Returns
    /// * `Ok(&[usize])` - The valid target slot indices.
    /// * `Err(FlowError::NothingToDefend)` - If every slot is already defended; the flow stays `Idle`.
    pub fn begin(&mut self, card: Card, snapshot: &GameSnapshot) -> Result<&[usize], FlowError> {
        let targets = snapshot.undefended_slots();
        if targets.is_empty() {
            *self = DefenseFlow::Idle;
            return Err(FlowError::NothingToDefend);
        }
        logger!(DEBUG, "[FLOW] Defending with {card}, targets {targets:?}");
        *self = DefenseFlow::CardChosen { card, targets };
        Ok(self.targets())
    }

    /// Confirms the attack to beat. A valid choice yields the `play_defense` message
    /// and returns the flow to `Idle`; an invalid one leaves the flow untouched.
    pub fn choose(&mut self, attack_index: usize) -> Result<ClientMessage, FlowError> {
        let card = match self {
            DefenseFlow::Idle => return Err(FlowError::NoCardChosen),
            DefenseFlow::CardChosen { card, targets } => {
                if !targets.contains(&attack_index) {
                    return Err(FlowError::InvalidTarget);
                }
                *card
            }
        };
        *self = DefenseFlow::Idle;
        Ok(ClientMessage::PlayDefense { card, attack_index })
    }

    pub fn cancel(&mut self) {
        *self = DefenseFlow::Idle;
    }

    /// Re-derives the targets from a fresh snapshot. The flow is dropped when the
    /// local player may no longer defend or nothing is left undefended.
    pub fn refresh(&mut self, snapshot: &GameSnapshot) {
        if let DefenseFlow::CardChosen { targets, .. } = self {
            let fresh = snapshot.undefended_slots();
            if !snapshot.available_actions.can_defend || fresh.is_empty() {
                logger!(DEBUG, "[FLOW] Defense no longer possible, closing selection");
                *self = DefenseFlow::Idle;
            } else {
                *targets = fresh;
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, DefenseFlow::CardChosen { .. })
    }

    pub fn targets(&self) -> &[usize] {
        match self {
            DefenseFlow::CardChosen { targets, .. } => targets,
            DefenseFlow::Idle => &[],
        }
    }

    pub fn card(&self) -> Option<Card> {
        match self {
            DefenseFlow::CardChosen { card, .. } => Some(*card),
            DefenseFlow::Idle => None,
        }
    }
}

/// Invite / waiting presentation mode.
///
/// `AwaitingIdentity` is entered from a shared link before the player has a seat;
/// `Waiting` keeps the lobby hidden behind a placeholder until the game starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InviteFlow {
    #[default]
    Inactive,
    AwaitingIdentity { game_id: String },
    Waiting { game_id: String },
}

impl InviteFlow {
    pub fn activate(&mut self, game_id: &str) {
        *self = InviteFlow::AwaitingIdentity {
            game_id: game_id.to_string(),
        };
    }

    pub fn elect_wait(&mut self, game_id: &str) {
        *self = InviteFlow::Waiting {
            game_id: game_id.to_string(),
        };
    }

    /// The seat is confirmed; keep waiting, but no longer for an identity.
    pub fn on_joined(&mut self) {
        if let InviteFlow::AwaitingIdentity { game_id } = self {
            *self = InviteFlow::Waiting {
                game_id: std::mem::take(game_id),
            };
        }
    }

    pub fn on_phase(&mut self, phase: Phase) {
        if phase != Phase::Lobby && self.is_active() {
            logger!(DEBUG, "[FLOW] Game left the lobby, leaving waiting mode");
            *self = InviteFlow::Inactive;
        }
    }

    pub fn cancel(&mut self) {
        *self = InviteFlow::Inactive;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, InviteFlow::Inactive)
    }

    pub fn needs_identity(&self) -> bool {
        matches!(self, InviteFlow::AwaitingIdentity { .. })
    }

    pub fn game_id(&self) -> Option<&str> {
        match self {
            InviteFlow::Inactive => None,
            InviteFlow::AwaitingIdentity { game_id } | InviteFlow::Waiting { game_id } => Some(game_id),
        }
    }
}

/// Rematch carries no local state; it is offered whenever the game has ended.
pub fn rematch_offered(snapshot: &GameSnapshot) -> bool {
    snapshot.phase == Phase::Ended
}

/// Shareable link: the server URL with the `game` query parameter set.
pub fn invite_link(base_url: &str, game_id: &str) -> String {
    match Url::parse(base_url) {
        Ok(mut url) => {
            url.query_pairs_mut().clear().append_pair("game", game_id);
            url.to_string()
        }
        Err(_) => format!("{}/?game={game_id}", base_url.trim_end_matches('/')),
    }
}

/// Reads the room code from a shared link, or accepts a bare code.
pub fn room_code_from_link(link: &str) -> Option<String> {
    let link = link.trim();
    let code = match Url::parse(link) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == "game")
            .map(|(_, value)| value.trim().to_string())?,
        Err(_) => link.to_string(),
    };
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(code.to_ascii_uppercase())
}
