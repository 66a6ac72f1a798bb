pub mod connection;
pub mod events;
pub mod protocol;
pub mod rest;
pub mod websocket;
