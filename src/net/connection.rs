use crate::game::identity_store::IdentityStore;
use crate::logger;
use crate::models::client_requests::ClientMessage;
use crate::models::server_messages::ServerMessage;
use crate::net::protocol::Protocol;
use crate::utils::errors::{NetworkError, ProtocolError};

pub type SessionId = u64;

/// What a transport reports about one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Opened,
    Message(String),
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub session: SessionId,
    pub event: SessionEvent,
}

/// Write half of an open session. Sends are fire-and-forget.
pub trait Transport {
    fn send_text(&mut self, text: String) -> Result<(), NetworkError>;
    fn close(&mut self);
}

/// Opens sessions. Implementations report progress as `TransportEvent`s tagged
/// with the given session id, delivered in transport order.
pub trait Connector {
    fn open(&mut self, session: SessionId, url: &str) -> Result<Box<dyn Transport>, NetworkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Open,
}

/// Result of handling a transport event for the live session.
#[derive(Debug)]
pub enum Inbound {
    Opened,
    Message(ServerMessage),
    Invalid(ProtocolError),
    Closed,
}

struct Session {
    id: SessionId,
    game_id: String,
    status: ConnectionStatus,
    authenticated: bool,
    join: ClientMessage,
    transport: Box<dyn Transport>,
}

/// Owns the single live session to a room.
///
/// Moves through `Disconnected -> Connecting -> Open -> Disconnected`. There is
/// no automatic retry; a new `connect` call is the only way back to `Open`.
pub struct ConnectionManager {
    base_url: String,
    connector: Box<dyn Connector>,
    next_session: SessionId,
    session: Option<Session>,
}

impl ConnectionManager {
    pub fn new(base_url: &str, connector: Box<dyn Connector>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            connector,
            next_session: 1,
            session: None,
        }
    }

    /// Builds the room-scoped websocket URL from an `http(s)` base URL.
    pub fn session_url(base_url: &str, game_id: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };
        format!("{base}/ws/{game_id}")
    }

    pub fn status(&self) -> ConnectionStatus {
        self.session
            .as_ref()
            .map(|s| s.status)
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    pub fn game_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.game_id.as_str())
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.authenticated)
    }

    /// Opens a session to `game_id`, closing any session that is already live.
    ///
    /// The display name is the explicit `name` when it is non-empty, otherwise the
    /// name stored for the room. The resolved name is stored for the room and the
    /// `join` handshake is queued until the transport reports the session open.
    ///
    /// # Arguments
    /// * `game_id` - Room code to connect to.
    /// * `name` - Display name typed by the user, if any.
    /// * `store` - Identity store consulted for the stored name and player id.
    ///
    /// # Returns
    /// * `Ok(String)` - The display name the join will carry.
    /// * `Err(NetworkError::ConnectError)` - If the transport could not be started.
    pub fn connect(
        &mut self,
        game_id: &str,
        name: Option<&str>,
        store: &mut dyn IdentityStore,
    ) -> Result<String, NetworkError> {
        self.close();

        let player_name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| store.stored_name(game_id))
            .unwrap_or_default();
        store.put_name(game_id, &player_name);

        let join = ClientMessage::Join {
            player_name: player_name.clone(),
            player_id: store.stored_id(game_id),
        };

        let session = self.next_session;
        self.next_session += 1;
        let url = Self::session_url(&self.base_url, game_id);
        logger!(INFO, "[SESSION] Opening session #{session} to `{url}`");
        let transport = self.connector.open(session, &url)?;

        self.session = Some(Session {
            id: session,
            game_id: game_id.to_string(),
            status: ConnectionStatus::Connecting,
            authenticated: false,
            join,
            transport,
        });
        Ok(player_name)
    }

    /// Closes the live session, if any. Later events from it are ignored.
    pub fn close(&mut self) {
        if let Some(mut session) = self.session.take() {
            logger!(DEBUG, "[SESSION] Closing session #{} to `{}`", session.id, session.game_id);
            session.transport.close();
        }
    }

    /// Handles one transport event.
    ///
    /// Events tagged with a session other than the live one are dropped and yield
    /// `None`. On `Opened` the queued `join` is sent. On `Closed` the session is
    /// discarded.
    pub fn handle_event(&mut self, event: TransportEvent) -> Option<Inbound> {
        let live = match self.session.as_mut() {
            Some(session) if session.id == event.session => session,
            _ => {
                logger!(DEBUG, "[SESSION] Dropping event from stale session #{}", event.session);
                return None;
            }
        };

        match event.event {
            SessionEvent::Opened => {
                live.status = ConnectionStatus::Open;
                logger!(INFO, "[SESSION] Session #{} open, sending join", live.id);
                let join = live.join.clone();
                if let Err(error) = self.send(&join) {
                    logger!(ERROR, "[SESSION] Could not send join ({error})");
                }
                Some(Inbound::Opened)
            }
            SessionEvent::Message(text) => match Protocol::parse(&text) {
                Ok(message) => {
                    if let ServerMessage::Joined { .. } = message {
                        live.authenticated = true;
                    }
                    Some(Inbound::Message(message))
                }
                Err(error) => {
                    logger!(WARN, "[PROTOCOL] Invalid message on session #{} ({error})", live.id);
                    Some(Inbound::Invalid(error))
                }
            },
            SessionEvent::Closed => {
                logger!(INFO, "[SESSION] Session #{} to `{}` closed", live.id, live.game_id);
                self.session = None;
                Some(Inbound::Closed)
            }
        }
    }

    /// Sends a message on the open session.
    ///
    /// # Returns
    /// * `Ok(())` - If the message was handed to the transport.
    /// * `Err(NetworkError::NotConnected)` - If no session is open.
    /// * `Err(NetworkError::SendError)` - If the message could not be encoded or queued.
    pub fn send(&mut self, message: &ClientMessage) -> Result<(), NetworkError> {
        let session = match self.session.as_mut() {
            Some(session) if session.status == ConnectionStatus::Open => session,
            _ => return Err(NetworkError::NotConnected),
        };
        let text = Protocol::wrap(message).map_err(|e| NetworkError::SendError(e.to_string()))?;
        session.transport.send_text(text)?;
        logger!(DEBUG, "[SESSION] Sent {message} on session #{}", session.id);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records everything written to any session it opens.
    #[derive(Default)]
    pub struct Recorder {
        pub opened: Vec<(SessionId, String)>,
        pub sent: Vec<(SessionId, String)>,
        pub closed: Vec<SessionId>,
    }

    impl Recorder {
        pub fn sent_json(&self) -> Vec<serde_json::Value> {
            self.sent
                .iter()
                .map(|(_, text)| serde_json::from_str(text).unwrap())
                .collect()
        }
    }

    #[derive(Clone, Default)]
    pub struct FakeConnector {
        pub recorder: Rc<RefCell<Recorder>>,
    }

    struct FakeTransport {
        session: SessionId,
        recorder: Rc<RefCell<Recorder>>,
    }

    impl Transport for FakeTransport {
        fn send_text(&mut self, text: String) -> Result<(), NetworkError> {
            self.recorder.borrow_mut().sent.push((self.session, text));
            Ok(())
        }

        fn close(&mut self) {
            self.recorder.borrow_mut().closed.push(self.session);
        }
    }

    impl Connector for FakeConnector {
        fn open(&mut self, session: SessionId, url: &str) -> Result<Box<dyn Transport>, NetworkError> {
            self.recorder.borrow_mut().opened.push((session, url.to_string()));
            Ok(Box::new(FakeTransport {
                session,
                recorder: Rc::clone(&self.recorder),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeConnector;
    use super::*;
    use crate::game::identity_store::MemoryIdentityStore;
    use serde_json::json;

    fn manager() -> (ConnectionManager, FakeConnector) {
        let connector = FakeConnector::default();
        let manager = ConnectionManager::new("https://durak.example/", Box::new(connector.clone()));
        (manager, connector)
    }

    fn event(session: SessionId, event: SessionEvent) -> TransportEvent {
        TransportEvent { session, event }
    }

    #[test]
    fn test_session_url_uses_ws_scheme() {
        assert_eq!(
            ConnectionManager::session_url("http://127.0.0.1:8000", "ABC123"),
            "ws://127.0.0.1:8000/ws/ABC123"
        );
        assert_eq!(
            ConnectionManager::session_url("https://durak.example/", "ABC123"),
            "wss://durak.example/ws/ABC123"
        );
    }

    #[test]
    fn test_join_sent_only_after_open() {
        let (mut manager, connector) = manager();
        let mut store = MemoryIdentityStore::new();
        store.put_id("ABC123", "p1");

        let name = manager.connect("ABC123", Some("  Ann "), &mut store).unwrap();
        assert_eq!(name, "Ann");
        assert_eq!(manager.status(), ConnectionStatus::Connecting);
        assert!(connector.recorder.borrow().sent.is_empty());

        let session = manager.session_id().unwrap();
        assert!(matches!(
            manager.handle_event(event(session, SessionEvent::Opened)),
            Some(Inbound::Opened)
        ));
        assert_eq!(manager.status(), ConnectionStatus::Open);
        assert_eq!(
            connector.recorder.borrow().sent_json(),
            vec![json!({"action": "join", "playerName": "Ann", "playerId": "p1"})]
        );
        // The resolved name is remembered for the room
        assert_eq!(store.stored_name("ABC123"), Some("Ann".to_string()));
    }

    #[test]
    fn test_stored_name_used_when_none_given() {
        let (mut manager, connector) = manager();
        let mut store = MemoryIdentityStore::new();
        store.put_name("ABC123", "Stored");

        let name = manager.connect("ABC123", None, &mut store).unwrap();
        assert_eq!(name, "Stored");
        let session = manager.session_id().unwrap();
        manager.handle_event(event(session, SessionEvent::Opened));
        assert_eq!(
            connector.recorder.borrow().sent_json(),
            vec![json!({"action": "join", "playerName": "Stored", "playerId": null})]
        );
    }

    #[test]
    fn test_reconnect_closes_previous_session_and_ignores_its_events() {
        let (mut manager, connector) = manager();
        let mut store = MemoryIdentityStore::new();

        manager.connect("ABC123", Some("Ann"), &mut store).unwrap();
        let first = manager.session_id().unwrap();
        manager.connect("XYZ999", Some("Ann"), &mut store).unwrap();
        let second = manager.session_id().unwrap();

        assert_ne!(first, second);
        assert_eq!(connector.recorder.borrow().closed, vec![first]);
        assert_eq!(manager.game_id(), Some("XYZ999"));

        let stale = manager.handle_event(event(
            first,
            SessionEvent::Message(r#"{"type":"error","message":"late"}"#.to_string()),
        ));
        assert!(stale.is_none());
        assert!(manager.handle_event(event(first, SessionEvent::Closed)).is_none());
        assert_eq!(manager.status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn test_send_requires_open_session() {
        let (mut manager, connector) = manager();
        let mut store = MemoryIdentityStore::new();
        assert!(matches!(manager.send(&ClientMessage::TakeCards), Err(NetworkError::NotConnected)));

        manager.connect("ABC123", Some("Ann"), &mut store).unwrap();
        // Still connecting
        assert!(matches!(manager.send(&ClientMessage::TakeCards), Err(NetworkError::NotConnected)));

        let session = manager.session_id().unwrap();
        manager.handle_event(event(session, SessionEvent::Opened));
        manager.send(&ClientMessage::TakeCards).unwrap();
        assert_eq!(connector.recorder.borrow().sent.len(), 2);
    }

    #[test]
    fn test_joined_marks_session_authenticated() {
        let (mut manager, _) = manager();
        let mut store = MemoryIdentityStore::new();
        manager.connect("ABC123", Some("Ann"), &mut store).unwrap();
        let session = manager.session_id().unwrap();
        manager.handle_event(event(session, SessionEvent::Opened));
        assert!(!manager.is_authenticated());

        let inbound = manager.handle_event(event(
            session,
            SessionEvent::Message(r#"{"type":"joined","playerId":"p1","gameId":"ABC123"}"#.to_string()),
        ));
        assert!(matches!(inbound, Some(Inbound::Message(ServerMessage::Joined { .. }))));
        assert!(manager.is_authenticated());
    }

    #[test]
    fn test_remote_close_returns_to_disconnected() {
        let (mut manager, _) = manager();
        let mut store = MemoryIdentityStore::new();
        manager.connect("ABC123", Some("Ann"), &mut store).unwrap();
        let session = manager.session_id().unwrap();
        manager.handle_event(event(session, SessionEvent::Opened));

        assert!(matches!(
            manager.handle_event(event(session, SessionEvent::Closed)),
            Some(Inbound::Closed)
        ));
        assert_eq!(manager.status(), ConnectionStatus::Disconnected);
        assert!(matches!(manager.send(&ClientMessage::PassAttack), Err(NetworkError::NotConnected)));
    }

    #[test]
    fn test_invalid_frame_keeps_session_open() {
        let (mut manager, _) = manager();
        let mut store = MemoryIdentityStore::new();
        manager.connect("ABC123", Some("Ann"), &mut store).unwrap();
        let session = manager.session_id().unwrap();
        manager.handle_event(event(session, SessionEvent::Opened));

        let inbound = manager.handle_event(event(session, SessionEvent::Message("{}".to_string())));
        assert!(matches!(inbound, Some(Inbound::Invalid(ProtocolError::MissingType))));
        assert_eq!(manager.status(), ConnectionStatus::Open);
    }
}
