use crate::game::gesture::GameAction;
use crate::game::view_state::ClientViewState;
use crate::logger;
use crate::models::card::Card;
use crate::models::client_requests::ClientMessage;
use crate::utils::errors::GateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Send(ClientMessage),
    OpenDefense(Card),
    Reject(GateError),
    Ignore,
}

/// Decides whether an in-game gesture is allowed right now.
///
/// The snapshot's capability flags are the only input; card ranks and suits are
/// never inspected. Rejections stay local and never reach the network.
pub fn evaluate(view: &ClientViewState, action: &GameAction) -> GateDecision {
    let actions = view
        .snapshot
        .as_ref()
        .map(|s| s.available_actions)
        .unwrap_or_default();

    let decision = match action {
        GameAction::SelectCard(card) => {
            let Some(snapshot) = view.snapshot.as_ref() else {
                return GateDecision::Ignore;
            };
            if !snapshot.own_hand(view.player_id()).contains(card) {
                GateDecision::Reject(GateError::NotInHand)
            } else if snapshot.is_defender(view.player_id()) && actions.can_defend {
                GateDecision::OpenDefense(*card)
            } else if actions.can_attack || actions.can_throw {
                GateDecision::Send(ClientMessage::PlayAttack { card: *card })
            } else {
                GateDecision::Reject(GateError::NotYourTurn)
            }
        }
        GameAction::PassAttack => flagged(actions.can_pass, ClientMessage::PassAttack),
        GameAction::TakeCards => flagged(actions.can_take, ClientMessage::TakeCards),
        GameAction::Surrender => flagged(actions.can_surrender, ClientMessage::Surrender),
        GameAction::StartGame => GateDecision::Send(ClientMessage::StartGame),
        GameAction::RequestRematch => GateDecision::Send(ClientMessage::RequestRematch),
        GameAction::CancelRematch => GateDecision::Send(ClientMessage::CancelRematch),
        GameAction::SendChat(text) => {
            let message = text.trim();
            if message.is_empty() {
                GateDecision::Ignore
            } else {
                GateDecision::Send(ClientMessage::SendChat {
                    message: message.to_string(),
                })
            }
        }
    };

    if let GateDecision::Reject(reason) = &decision {
        logger!(DEBUG, "[GATE] Rejected {action:?} ({reason})");
    }
    decision
}

// A gesture on a disabled control is rejected, never forwarded.
fn flagged(enabled: bool, message: ClientMessage) -> GateDecision {
    if enabled {
        GateDecision::Send(message)
    } else {
        GateDecision::Reject(GateError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::snapshot::{AvailableActions, GameSnapshot};
    use serde_json::json;
    use std::time::Duration;

    fn view(defender: &str, actions: serde_json::Value) -> ClientViewState {
        let attacker = if defender == "p1" { "p2" } else { "p1" };
        let snapshot: GameSnapshot = serde_json::from_value(json!({
            "id": "ABC123", "phase": "playing", "maxPlayers": 2,
            "players": [
                {"id": "p1", "name": "Ann", "hand": [{"rank": "10", "suit": "S"}, {"rank": "6", "suit": "C"}]},
                {"id": "p2", "name": "Bob"}
            ],
            "attackerId": attacker,
            "defenderId": defender,
            "availableActions": actions
        }))
        .unwrap();
        let mut view = ClientViewState::new(Duration::from_secs(1));
        view.identity.player_id = Some("p1".to_string());
        view.snapshot = Some(snapshot);
        view
    }

    fn card() -> Card {
        "10S".parse().unwrap()
    }

    #[test]
    fn test_defender_card_opens_defense_flow() {
        let view = view("p1", json!({"canDefend": true, "canTake": true}));
        assert_eq!(
            evaluate(&view, &GameAction::SelectCard(card())),
            GateDecision::OpenDefense(card())
        );
    }

    #[test]
    fn test_attacker_card_is_sent_immediately() {
        let view = view("p2", json!({"canAttack": true}));
        assert_eq!(
            evaluate(&view, &GameAction::SelectCard(card())),
            GateDecision::Send(ClientMessage::PlayAttack { card: card() })
        );

        let throw_in = view_with_throw();
        assert!(matches!(
            evaluate(&throw_in, &GameAction::SelectCard(card())),
            GateDecision::Send(ClientMessage::PlayAttack { .. })
        ));
    }

    fn view_with_throw() -> ClientViewState {
        view("p2", json!({"canThrow": true}))
    }

    #[test]
    fn test_card_rejected_without_flags() {
        let view = view("p2", json!({}));
        assert_eq!(
            evaluate(&view, &GameAction::SelectCard(card())),
            GateDecision::Reject(GateError::NotYourTurn)
        );
    }

    #[test]
    fn test_defender_without_can_defend_falls_back_to_attack_flags() {
        let view = view("p1", json!({"canDefend": false}));
        assert_eq!(
            evaluate(&view, &GameAction::SelectCard(card())),
            GateDecision::Reject(GateError::NotYourTurn)
        );
    }

    #[test]
    fn test_pass_rejected_take_allowed() {
        let view = view("p1", json!({"canPass": false, "canTake": true}));
        assert_eq!(
            evaluate(&view, &GameAction::PassAttack),
            GateDecision::Reject(GateError::Unavailable)
        );
        assert_eq!(
            evaluate(&view, &GameAction::TakeCards),
            GateDecision::Send(ClientMessage::TakeCards)
        );
    }

    #[test]
    fn test_no_message_when_flags_are_false() {
        let view = view("p1", serde_json::to_value(AvailableActions::default()).unwrap());
        for action in [
            GameAction::SelectCard(card()),
            GameAction::PassAttack,
            GameAction::TakeCards,
            GameAction::Surrender,
        ] {
            assert!(!matches!(evaluate(&view, &action), GateDecision::Send(_)), "{action:?}");
        }
    }

    #[test]
    fn test_chat_is_trimmed_and_empty_ignored() {
        let view = view("p1", json!({}));
        assert_eq!(evaluate(&view, &GameAction::SendChat("   ".to_string())), GateDecision::Ignore);
        assert_eq!(
            evaluate(&view, &GameAction::SendChat("  good game ".to_string())),
            GateDecision::Send(ClientMessage::SendChat {
                message: "good game".to_string()
            })
        );
    }

    #[test]
    fn test_lobby_and_rematch_actions_map_directly() {
        let view = view("p1", json!({}));
        assert_eq!(evaluate(&view, &GameAction::StartGame), GateDecision::Send(ClientMessage::StartGame));
        assert_eq!(
            evaluate(&view, &GameAction::RequestRematch),
            GateDecision::Send(ClientMessage::RequestRematch)
        );
        assert_eq!(
            evaluate(&view, &GameAction::CancelRematch),
            GateDecision::Send(ClientMessage::CancelRematch)
        );
    }

    #[test]
    fn test_card_not_in_hand_is_rejected() {
        let attacking = view("p2", json!({"canAttack": true}));
        let ace: Card = "AS".parse().unwrap();
        assert_eq!(
            evaluate(&attacking, &GameAction::SelectCard(ace)),
            GateDecision::Reject(GateError::NotInHand)
        );

        let defending = view("p1", json!({"canDefend": true}));
        assert_eq!(
            evaluate(&defending, &GameAction::SelectCard(ace)),
            GateDecision::Reject(GateError::NotInHand)
        );
        assert_eq!(
            evaluate(&defending, &GameAction::SelectCard("6C".parse().unwrap())),
            GateDecision::OpenDefense("6C".parse().unwrap())
        );
    }

    #[test]
    fn test_card_without_snapshot_is_ignored() {
        let view = ClientViewState::new(Duration::from_secs(1));
        assert_eq!(evaluate(&view, &GameAction::SelectCard(card())), GateDecision::Ignore);
    }
}
