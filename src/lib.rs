//! Volley Rating - skill rating engine for casual volleyball match tracking
//!
//! This crate provides a Glicko-2 derived rating calculator with
//! victory-margin weighting and a configurable K-factor, plus the settings
//! and storage interfaces the host application wires it into.

pub mod config;
pub mod error;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use config::{RatingSettings, VictoryMarginWeight};
pub use rating::{Glicko2RatingCalculator, RatingCalculator, RatingStorage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
