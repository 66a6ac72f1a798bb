use serde_json::Value;

use crate::logger;
use crate::models::client_requests::ClientMessage;
use crate::models::server_messages::ServerMessage;
use crate::utils::errors::ProtocolError;

/// JSON codec for the room session.
///
/// Outbound messages are objects tagged by `action`, inbound messages are
/// objects tagged by `type`. Transport-level ordering and delivery are assumed;
/// the codec never reorders or deduplicates.
pub struct Protocol;

impl Protocol {
    /// Parses one inbound text frame into a `ServerMessage`.
    ///
    /// # Arguments
    /// * `text` - The raw text frame received from the session.
    ///
    /// # Returns
    /// * `Ok(ServerMessage)` - If the frame is a known, well-formed message.
    /// * `Err(ProtocolError::MissingType)` - If the frame has no string `type` field.
    /// * `Err(ProtocolError::UnknownMessageType)` - If the `type` tag is not recognized.
    /// * `Err(ProtocolError::MalformedMessage)` - If the frame is not JSON or a known tag has a bad body.
    pub fn parse(text: &str) -> Result<ServerMessage, ProtocolError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ProtocolError::MalformedMessage(e.to_string()))?;

        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?;

        if !ServerMessage::TAGS.contains(&tag) {
            logger!(WARN, "[PROTOCOL] Ignoring message with unknown type `{tag}`");
            return Err(ProtocolError::UnknownMessageType(tag.to_string()));
        }

        let message = serde_json::from_value::<ServerMessage>(value)
            .map_err(|e| ProtocolError::MalformedMessage(e.to_string()))?;
        logger!(DEBUG, "[PROTOCOL] Received message {{ type: {message} }}");
        Ok(message)
    }

    /// Serializes an outbound message into a text frame.
    pub fn wrap(message: &ClientMessage) -> Result<String, ProtocolError> {
        serde_json::to_string(message).map_err(|_| ProtocolError::EncodeError(message.to_string()))
    }
}
