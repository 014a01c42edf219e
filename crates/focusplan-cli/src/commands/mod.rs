pub mod completions;
pub mod config;
pub mod conflicts;
pub mod input;
pub mod intake;
pub mod plan;
pub mod preference;
