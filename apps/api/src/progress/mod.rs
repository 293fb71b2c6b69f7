// Task completion, streaks and the derived current phase, plus the read-only
// detailed and dashboard views built on top of them.

pub mod handlers;
pub mod service;
pub mod tracker;
pub mod views;
