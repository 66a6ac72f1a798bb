use crate::net::connection::TransportEvent;
use crate::utils::errors::RoomRequestError;

/// Everything the event loop reacts to. Background tasks only ever produce these.
#[derive(Debug)]
pub enum ClientEvent {
    Transport(TransportEvent),
    RoomCreated {
        player_name: String,
        result: Result<String, RoomRequestError>,
    },
    Input(String),
    InputClosed,
}
