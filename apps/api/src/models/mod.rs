pub mod intake;
pub mod interaction;
pub mod plan;
pub mod progress;
pub mod user;
