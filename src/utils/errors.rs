use thiserror::Error;

/// Failures while decoding inbound or encoding outbound session messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),
    #[error("Message has no `type` field")]
    MissingType,
    #[error("Unknown message type `{0}`")]
    UnknownMessageType(String),
    #[error("Could not encode `{0}` message")]
    EncodeError(String),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("No open session")]
    NotConnected,
    #[error("Unable to open session: {0}")]
    ConnectError(String),
    #[error("Unable to send message through session: {0}")]
    SendError(String),
}

#[derive(Debug, Error)]
pub enum RoomRequestError {
    #[error("Room request failed: {0}")]
    UnexpectedRoomRequestError(String),
    #[error("Room request returned status {0}")]
    UnexpectedStatus(u16),
    #[error("Room response could not be parsed: {0}")]
    InvalidResponseBody(String),
}

/// Local input validation failures. The display text is shown to the user as is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Enter a name to create a game.")]
    MissingCreatorName,
    #[error("Enter your name.")]
    MissingName,
    #[error("Player count must be between 2 and 6.")]
    PlayerCount,
    #[error("Enter the 6-character invite code.")]
    JoinCode,
    #[error("Unknown card `{0}`.")]
    InvalidCard(String),
    #[error("Unknown command `{0}`. Type `help` for the list.")]
    UnknownCommand(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Identity file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Identity file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unable to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// Local rejections of gestures. The display text is shown to the user as is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("You can't play this card right now.")]
    NotYourTurn,
    #[error("That action is not available right now.")]
    Unavailable,
    #[error("You don't have that card.")]
    NotInHand,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Nothing to defend against.")]
    NothingToDefend,
    #[error("Pick a card to defend with first.")]
    NoCardChosen,
    #[error("Choose one of the undefended cards.")]
    InvalidTarget,
    #[error("A name is required to join.")]
    NameRequired,
    #[error("Join a room first.")]
    NoRoom,
}
