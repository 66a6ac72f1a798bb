use reqwest::StatusCode;
use tokio::sync::mpsc::UnboundedSender;

use crate::logger;
use crate::models::client_requests::CreateGameRequest;
use crate::models::http_response::CreateGameResponse;
use crate::net::events::ClientEvent;
use crate::utils::errors::RoomRequestError;

/// Creates rooms on behalf of the controller. The outcome arrives later as an
/// independent event, so implementations must not block.
pub trait RoomService {
    fn request_room(&mut self, player_name: String, max_players: u8);
}

/// Requests a new room from the server.
///
/// # Arguments
/// * `http` - Shared HTTP client.
/// * `base_url` - Server base URL, without the `/api` suffix.
/// * `max_players` - Seats in the new room, already validated to 2..=6.
///
/// # Returns
/// * `Ok(String)` - The new room code.
/// * `Err(RoomRequestError)` - If the request fails, the status is not a success or the body is unreadable.
pub async fn create_room(
    http: &reqwest::Client,
    base_url: &str,
    max_players: u8,
) -> Result<String, RoomRequestError> {
    let api_url = format!("{}/api/games", base_url.trim_end_matches('/'));
    let body = CreateGameRequest { max_players };

    match http.post(api_url).json(&body).send().await {
        Err(error) => Err(RoomRequestError::UnexpectedRoomRequestError(error.to_string())),
        Ok(response) => match response.status() {
            status if status.is_success() => {
                let created = response
                    .json::<CreateGameResponse>()
                    .await
                    .map_err(|e| RoomRequestError::InvalidResponseBody(e.to_string()))?;
                Ok(created.game_id)
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let detail = response.text().await.unwrap_or("NO MESSAGE".to_string());
                logger!(WARN, "[ROOMS] Server rejected room request ({detail})");
                Err(RoomRequestError::UnexpectedStatus(422))
            }
            status => Err(RoomRequestError::UnexpectedStatus(status.as_u16())),
        },
    }
}

/// `RoomService` backed by the REST endpoint; each request runs on its own task.
pub struct HttpRoomService {
    http: reqwest::Client,
    base_url: String,
    events: UnboundedSender<ClientEvent>,
}

impl HttpRoomService {
    pub fn new(base_url: &str, events: UnboundedSender<ClientEvent>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            events,
        }
    }
}

impl RoomService for HttpRoomService {
    fn request_room(&mut self, player_name: String, max_players: u8) {
        let http = self.http.clone();
        let base_url = self.base_url.clone();
        let events = self.events.clone();
        logger!(INFO, "[ROOMS] Requesting a room for {max_players} players");

        tokio::spawn(async move {
            let result = create_room(&http, &base_url, max_players).await;
            let _ = events.send(ClientEvent::RoomCreated {
                player_name,
                result,
            });
        });
    }
}
