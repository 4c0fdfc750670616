//! Configuration management for the rating service
//!
//! This module handles the tunable rating settings, their environment-variable
//! loading, and caller-side validation helpers.

pub mod rating;

// Re-export commonly used types
pub use rating::{validate_settings, RatingSettings, VictoryMarginWeight};
