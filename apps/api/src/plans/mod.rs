// Career plan generation from a finished intake, and single-phase regeneration.

pub mod generator;
pub mod handlers;
pub mod prompts;
