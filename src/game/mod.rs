pub mod action_gate;
pub mod diff;
pub mod entry;
pub mod flow;
pub mod gesture;
pub mod identity_store;
pub mod instance;
pub mod notifications;
pub mod reconciler;
pub mod view_state;
