use std::fmt::{self, Display, Write as _};

use crate::game::diff::{hand_key, table_key, TableRole};
use crate::game::flow::rematch_offered;
use crate::game::reconciler::ChangeSet;
use crate::game::view_state::ClientViewState;
use crate::models::card::Card;
use crate::models::snapshot::{GameSnapshot, Phase, PlayerView};
use crate::render::hand::sort_hand;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLine {
    pub name: String,
    pub is_you: bool,
    pub is_host: bool,
    pub detail: String,
    pub is_attacker: bool,
    pub is_defender: bool,
    pub is_loser: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyPanel {
    pub room_code: String,
    pub seats: String,
    pub players: Vec<PlayerLine>,
    pub can_start: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCard {
    pub card: Card,
    pub role: TableRole,
    pub slot: usize,
    pub is_new: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandCard {
    pub card: Card,
    pub is_new: bool,
}

/// Enabled state of each in-game control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub pass: bool,
    pub take: bool,
    pub surrender: bool,
    pub rematch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefensePrompt {
    pub card: Card,
    pub targets: Vec<(usize, Card)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePanel {
    pub room_code: String,
    pub status: String,
    pub deck_count: usize,
    pub discard_count: usize,
    pub trump: Option<Card>,
    pub players: Vec<PlayerLine>,
    pub table: Vec<TableCard>,
    pub hand: Vec<HandCard>,
    pub controls: Controls,
    pub defense: Option<DefensePrompt>,
    pub outcome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Entry,
    Waiting { game_id: Option<String>, name_prompt: bool },
    Lobby(LobbyPanel),
    Game(GamePanel),
}

/// A read-only projection of the view state, recomputed after every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub panel: Panel,
    pub chat: Option<Vec<String>>,
    pub invite_link: Option<String>,
    pub notification: Option<String>,
}

impl Frame {
    /// Projects the view state.
    ///
    /// # Arguments
    /// * `view` - The current view state.
    /// * `changes` - The change set of the last reconciled snapshot; drives the "new" flags.
    pub fn project(view: &ClientViewState, changes: &ChangeSet) -> Self {
        let me = view.player_id();
        let panel = match view.snapshot.as_ref() {
            None if view.invite.is_active() || view.name_prompt => Panel::Waiting {
                game_id: view.invite.game_id().map(str::to_string),
                name_prompt: view.name_prompt,
            },
            None => Panel::Entry,
            Some(snapshot) if snapshot.phase == Phase::Lobby => {
                if view.invite.is_active() {
                    Panel::Waiting {
                        game_id: Some(snapshot.id.clone()),
                        name_prompt: view.name_prompt,
                    }
                } else {
                    Panel::Lobby(lobby_panel(snapshot, me))
                }
            }
            Some(snapshot) => Panel::Game(game_panel(view, snapshot, changes)),
        };

        let chat = view
            .snapshot
            .as_ref()
            .filter(|s| me.is_some() && s.phase != Phase::Lobby)
            .map(|s| {
                s.chat
                    .iter()
                    .map(|line| format!("{}: {}", line.player_name, line.text))
                    .collect()
            });

        Frame {
            panel,
            chat,
            invite_link: view.invite_link.clone(),
            notification: view.notifications.current().map(str::to_string),
        }
    }
}

fn player_line(snapshot: &GameSnapshot, player: &PlayerView, me: Option<&str>) -> PlayerLine {
    let detail = if player.is_out {
        "out".to_string()
    } else if !player.connected {
        "disconnected".to_string()
    } else {
        format!("{} cards", player.hand_size)
    };
    PlayerLine {
        name: player.name.clone(),
        is_you: me == Some(player.id.as_str()),
        is_host: player.is_host,
        detail,
        is_attacker: snapshot.attacker_id.as_deref() == Some(player.id.as_str()),
        is_defender: snapshot.defender_id.as_deref() == Some(player.id.as_str()),
        is_loser: snapshot.loser_id.as_deref() == Some(player.id.as_str()),
    }
}

fn lobby_panel(snapshot: &GameSnapshot, me: Option<&str>) -> LobbyPanel {
    let active = snapshot.players.iter().filter(|p| !p.is_out).count();
    let is_host = me
        .and_then(|id| snapshot.find_player(id))
        .is_some_and(|p| p.is_host);
    LobbyPanel {
        room_code: snapshot.id.clone(),
        seats: format!("{}/{}", snapshot.players.len(), snapshot.max_players),
        players: snapshot
            .players
            .iter()
            .map(|p| player_line(snapshot, p, me))
            .collect(),
        can_start: is_host && active >= 2,
    }
}

fn outcome(snapshot: &GameSnapshot) -> Option<String> {
    if snapshot.phase != Phase::Ended {
        return None;
    }
    let name_of = |id: &str| snapshot.find_player(id).map(|p| p.name.clone());
    if let Some(fled) = snapshot.surrendered_player.as_deref() {
        let name = name_of(fled).unwrap_or_else(|| "A player".to_string());
        return Some(format!("{name} surrendered and fled."));
    }
    let winner = snapshot
        .winner_id
        .as_deref()
        .and_then(name_of)
        .unwrap_or_else(|| "everyone".to_string());
    Some(format!("Winner: {winner}"))
}

fn game_panel(view: &ClientViewState, snapshot: &GameSnapshot, changes: &ChangeSet) -> GamePanel {
    let me = view.player_id();
    let actions = snapshot.available_actions;

    let mut table = Vec::with_capacity(snapshot.table.len() * 2);
    for (slot, entry) in snapshot.table.iter().enumerate() {
        let placed = std::iter::once((entry.attack, TableRole::Attack))
            .chain(entry.defense.map(|card| (card, TableRole::Defense)));
        for (card, role) in placed {
            table.push(TableCard {
                card,
                role,
                slot,
                is_new: changes.appeared.table.contains(&table_key(&card, role, slot)),
            });
        }
    }

    let hand = sort_hand(snapshot.own_hand(me), snapshot.trump_suit())
        .into_iter()
        .map(|card| HandCard {
            card,
            is_new: changes.appeared.hand.contains(&hand_key(&card)),
        })
        .collect();

    let defense = view.defense.card().map(|card| DefensePrompt {
        card,
        targets: view
            .defense
            .targets()
            .iter()
            .filter_map(|&i| snapshot.table.get(i).map(|slot| (i, slot.attack)))
            .collect(),
    });

    GamePanel {
        room_code: snapshot.id.clone(),
        status: snapshot.status.clone(),
        deck_count: snapshot.deck_count,
        discard_count: snapshot.discard_count,
        trump: snapshot.trump_card,
        players: snapshot
            .players
            .iter()
            .map(|p| player_line(snapshot, p, me))
            .collect(),
        table,
        hand,
        controls: Controls {
            pass: actions.can_pass,
            take: actions.can_take,
            surrender: actions.can_surrender,
            rematch: rematch_offered(snapshot),
        },
        defense,
        outcome: outcome(snapshot),
    }
}

fn on_off(enabled: bool, label: &str) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}

impl Display for PlayerLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_you {
            write!(f, " (you)")?;
        }
        if self.is_host {
            write!(f, " *host")?;
        }
        write!(f, " - {}", self.detail)?;
        if self.is_attacker {
            write!(f, " [attacking]")?;
        }
        if self.is_defender {
            write!(f, " [defending]")?;
        }
        if self.is_loser {
            write!(f, " [durak]")?;
        }
        Ok(())
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.panel {
            Panel::Entry => {
                writeln!(f, "== Durak ==")?;
                writeln!(f, "create <name> <players>  |  join <code> <name>")?;
            }
            Panel::Waiting { game_id, name_prompt } => {
                writeln!(f, "== Waiting for the game to start ==")?;
                if let Some(code) = game_id {
                    writeln!(f, "Room {code}")?;
                }
                if *name_prompt {
                    writeln!(f, "Enter your name: name <name>")?;
                }
                writeln!(f, "leave to return to the menu")?;
            }
            Panel::Lobby(lobby) => {
                writeln!(f, "== Lobby {} ({}) ==", lobby.room_code, lobby.seats)?;
                for player in &lobby.players {
                    writeln!(f, "  {player}")?;
                }
                if lobby.can_start {
                    writeln!(f, "start to begin")?;
                }
            }
            Panel::Game(game) => write_game(f, game)?,
        }

        if let Some(chat) = &self.chat {
            writeln!(f, "-- chat --")?;
            for line in chat.iter().rev().take(5).rev() {
                writeln!(f, "  {line}")?;
            }
        }
        if let Some(link) = &self.invite_link {
            writeln!(f, "Invite: {link}")?;
        }
        if let Some(text) = &self.notification {
            writeln!(f, "! {text}")?;
        }
        Ok(())
    }
}

fn write_game(f: &mut fmt::Formatter<'_>, game: &GamePanel) -> fmt::Result {
    writeln!(f, "== Game {} ==", game.room_code)?;
    if !game.status.is_empty() {
        writeln!(f, "{}", game.status)?;
    }
    let trump = game.trump.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string());
    writeln!(
        f,
        "Deck: {}  Discard: {}  Trump: {trump}",
        game.deck_count, game.discard_count
    )?;
    for player in &game.players {
        writeln!(f, "  {player}")?;
    }

    if game.table.is_empty() {
        writeln!(f, "Table is empty.")?;
    } else {
        let mut line = String::from("Table:");
        for card in &game.table {
            let marker = match card.role {
                TableRole::Attack => format!(" {}:", card.slot + 1),
                TableRole::Defense => "/".to_string(),
            };
            let _ = write!(line, "{marker}{}{}", card.card, if card.is_new { "*" } else { "" });
        }
        writeln!(f, "{line}")?;
    }

    let hand: Vec<String> = game
        .hand
        .iter()
        .map(|c| format!("{}{}", c.card, if c.is_new { "*" } else { "" }))
        .collect();
    writeln!(f, "Hand: {}", hand.join(" "))?;

    if let Some(prompt) = &game.defense {
        let targets: Vec<String> = prompt
            .targets
            .iter()
            .map(|(slot, card)| format!("{}:{card}", slot + 1))
            .collect();
        writeln!(f, "Beat which card with {}? {}  (defend <n> | cancel)", prompt.card, targets.join(" "))?;
    }

    let controls = &game.controls;
    writeln!(
        f,
        "{} {} {}",
        on_off(controls.pass, "pass"),
        on_off(controls.take, "take"),
        on_off(controls.surrender, "surrender")
    )?;
    if let Some(outcome) = &game.outcome {
        writeln!(f, "*** {outcome} ***")?;
        if controls.rematch {
            writeln!(f, "rematch | norematch | menu")?;
        }
    }
    Ok(())
}
