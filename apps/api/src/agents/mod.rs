// Advisor personas and per-persona chat with a short replayed history.

pub mod chat;
pub mod handlers;
pub mod personas;
