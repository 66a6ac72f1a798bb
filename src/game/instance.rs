use std::time::Instant;

use crate::game::action_gate::{self, GateDecision};
use crate::game::entry;
use crate::game::flow::{invite_link, room_code_from_link};
use crate::game::gesture::{ActionSink, GameAction, Gesture};
use crate::game::identity_store::IdentityStore;
use crate::game::reconciler::{ChangeSet, SnapshotReconciler};
use crate::game::view_state::ClientViewState;
use crate::logger;
use crate::models::card::Card;
use crate::models::client_requests::ClientMessage;
use crate::models::server_messages::ServerMessage;
use crate::models::settings::Settings;
use crate::net::connection::{ConnectionManager, Connector, Inbound, TransportEvent};
use crate::net::rest::RoomService;
use crate::utils::errors::{FlowError, NetworkError, RoomRequestError};

pub const MSG_NOT_CONNECTED: &str = "Not connected to the server.";
pub const MSG_CONNECT_FAILED: &str = "Could not connect to the server.";
pub const MSG_SEND_FAILED: &str = "Could not send the action.";
pub const MSG_CONNECTION_CLOSED: &str = "Connection closed.";
pub const MSG_ROOM_CREATED: &str = "Room created, share the link!";
pub const MSG_ROOM_FAILED: &str = "Could not create the room.";
pub const MSG_ENTER_NAME: &str = "Enter your name to join.";
pub const MSG_BAD_LINK: &str = "The invite link has no room code.";

/// One running client: the view state plus the collaborators that feed it.
///
/// Every inbound event and every gesture goes through this type, one at a time.
pub struct ClientInstance {
    pub settings: Settings,
    pub view: ClientViewState,
    connection: ConnectionManager,
    store: Box<dyn IdentityStore>,
    rooms: Box<dyn RoomService>,
}

impl ClientInstance {
    pub fn new(
        settings: Settings,
        connector: Box<dyn Connector>,
        store: Box<dyn IdentityStore>,
        rooms: Box<dyn RoomService>,
    ) -> Self {
        let connection = ConnectionManager::new(settings.base_url(), connector);
        let view = ClientViewState::new(settings.notification_ttl());
        Self {
            settings,
            view,
            connection,
            store,
            rooms,
        }
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.view.notifications.notify(text);
    }

    /// Starts from a shared link or bare room code.
    ///
    /// Waiting mode is activated right away. The session opens immediately when a
    /// name is stored for the room; otherwise the user is asked for one and no
    /// session opens until `SubmitName` carries a non-empty name.
    pub fn start_from_link(&mut self, link: &str) {
        let Some(code) = room_code_from_link(link) else {
            logger!(WARN, "[FLOW] Ignoring link without a room code: `{link}`");
            self.notify(MSG_BAD_LINK);
            return;
        };

        self.update_invite_link(&code);
        self.view.invite.activate(&code);
        self.view.identity.game_id = Some(code.clone());

        match self.store.stored_name(&code) {
            Some(name) => self.connect(&code, Some(&name)),
            None => {
                self.view.name_prompt = true;
                self.notify(MSG_ENTER_NAME);
            }
        }
    }

    /// Handles one transport event.
    ///
    /// # Returns
    /// * `Some(ChangeSet)` - If a snapshot was reconciled.
    /// * `None` - For every other event, including events from stale sessions.
    pub fn handle_transport(&mut self, event: TransportEvent) -> Option<ChangeSet> {
        match self.connection.handle_event(event)? {
            Inbound::Opened | Inbound::Invalid(_) => None,
            Inbound::Closed => {
                self.notify(MSG_CONNECTION_CLOSED);
                None
            }
            Inbound::Message(ServerMessage::Joined { player_id, game_id }) => {
                self.on_joined(player_id, game_id);
                None
            }
            Inbound::Message(ServerMessage::GameState { game }) => {
                Some(SnapshotReconciler::apply(&mut self.view, *game))
            }
            Inbound::Message(ServerMessage::Error { message }) => {
                self.notify(message);
                None
            }
        }
    }

    /// Completes a room creation started by `CreateGame`.
    pub fn handle_room_created(&mut self, player_name: String, result: Result<String, RoomRequestError>) {
        match result {
            Ok(game_id) => {
                logger!(INFO, "[ROOMS] Room `{game_id}` created");
                self.update_invite_link(&game_id);
                self.connect(&game_id, Some(&player_name));
                self.notify(MSG_ROOM_CREATED);
            }
            Err(error) => {
                logger!(ERROR, "[ROOMS] {error}");
                self.notify(MSG_ROOM_FAILED);
            }
        }
    }

    /// Closes the live session before the process exits.
    pub fn shutdown(&mut self) {
        self.connection.close();
    }

    /// Expires the transient notification. Returns `true` if the screen changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.view.notifications.expire(now)
    }

    fn on_joined(&mut self, player_id: String, game_id: String) {
        logger!(INFO, "[SESSION] Joined `{game_id}` as `{player_id}`");
        self.store.put_id(&game_id, &player_id);
        self.store.put_name(&game_id, &self.view.identity.player_name);

        if self.connection.game_id() != Some(game_id.as_str()) {
            logger!(WARN, "[SESSION] Join acknowledged for `{game_id}`, not the live room; view left as is");
            return;
        }
        self.view.identity.player_id = Some(player_id);
        self.view.identity.game_id = Some(game_id.clone());
        self.update_invite_link(&game_id);
        self.view.invite.on_joined();
        self.view.name_prompt = false;
    }

    fn connect(&mut self, game_id: &str, name: Option<&str>) {
        let previous = self
            .view
            .snapshot
            .as_ref()
            .map(|s| s.id.as_str())
            .or(self.connection.game_id());
        if previous.is_some_and(|room| room != game_id) {
            logger!(DEBUG, "[SESSION] Switching rooms, dropping state of `{}`", previous.unwrap_or_default());
            self.view.leave_room();
        }

        match self.connection.connect(game_id, name, self.store.as_mut()) {
            Ok(player_name) => {
                self.view.identity.game_id = Some(game_id.to_string());
                self.view.identity.player_name = player_name;
            }
            Err(error) => {
                logger!(ERROR, "[SESSION] {error}");
                self.notify(MSG_CONNECT_FAILED);
            }
        }
    }

    fn update_invite_link(&mut self, game_id: &str) {
        self.view.invite_link = Some(invite_link(self.settings.base_url(), game_id));
    }

    fn send(&mut self, message: ClientMessage) {
        match self.connection.send(&message) {
            Ok(()) => {}
            Err(NetworkError::NotConnected) => self.notify(MSG_NOT_CONNECTED),
            Err(error) => {
                logger!(ERROR, "[SESSION] Could not send {message} ({error})");
                self.notify(MSG_SEND_FAILED);
            }
        }
    }

    fn submit_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.notify(FlowError::NameRequired.to_string());
            return;
        }
        let Some(game_id) = self
            .view
            .invite
            .game_id()
            .or(self.view.identity.game_id.as_deref())
            .map(str::to_string)
        else {
            self.notify(FlowError::NoRoom.to_string());
            return;
        };
        self.view.name_prompt = false;
        self.update_invite_link(&game_id);
        self.connect(&game_id, Some(name));
    }

    fn open_defense(&mut self, card: Card) {
        let Some(snapshot) = self.view.snapshot.as_ref() else {
            return;
        };
        if let Err(error) = self.view.defense.begin(card, snapshot) {
            self.notify(error.to_string());
        }
    }

    fn choose_defense_target(&mut self, attack_index: usize) {
        match self.view.defense.choose(attack_index) {
            Ok(message) => self.send(message),
            Err(error) => self.notify(error.to_string()),
        }
    }

    fn play(&mut self, action: GameAction) {
        match action_gate::evaluate(&self.view, &action) {
            GateDecision::Send(message) => self.send(message),
            GateDecision::OpenDefense(card) => self.open_defense(card),
            GateDecision::Reject(reason) => self.notify(reason.to_string()),
            GateDecision::Ignore => {}
        }
    }
}

impl ActionSink for ClientInstance {
    fn dispatch(&mut self, gesture: Gesture) {
        logger!(DEBUG, "[GESTURE] {gesture:?}");
        match gesture {
            Gesture::CreateGame { name, max_players } => match entry::validate_create(&name, &max_players) {
                Ok((name, count)) => self.rooms.request_room(name, count),
                Err(error) => self.notify(error.to_string()),
            },
            Gesture::JoinGame { code, name } => match entry::validate_join(&code, &name) {
                Ok((code, name)) => {
                    self.update_invite_link(&code);
                    self.connect(&code, Some(&name));
                }
                Err(error) => self.notify(error.to_string()),
            },
            Gesture::SubmitName(name) => self.submit_name(&name),
            Gesture::ElectWait => match self.view.identity.game_id.clone() {
                Some(game_id) => self.view.invite.elect_wait(&game_id),
                None => self.notify(FlowError::NoRoom.to_string()),
            },
            Gesture::CancelWaiting => {
                self.view.invite.cancel();
                self.view.name_prompt = false;
            }
            Gesture::ExitToMenu => {
                self.connection.close();
                self.view.reset();
            }
            Gesture::ChooseDefenseTarget(attack_index) => self.choose_defense_target(attack_index),
            Gesture::CancelDefense => self.view.defense.cancel(),
            Gesture::Play(action) => self.play(action),
        }
    }
}
