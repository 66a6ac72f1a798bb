pub mod card;
pub mod client_requests;
pub mod http_response;
pub mod server_messages;
pub mod settings;
pub mod snapshot;
