pub mod game;
pub mod models;
pub mod net;
pub mod render;
pub mod utils;
