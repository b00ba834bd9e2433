//! CLI library components for the trial matcher.

pub mod logging;
pub mod pipeline;
pub mod types;
