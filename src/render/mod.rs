pub mod commands;
pub mod frame;
pub mod hand;
