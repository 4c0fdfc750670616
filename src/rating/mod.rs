//! Player rating subsystem
//!
//! This module provides the Glicko-2 derived rating calculations, the
//! calculator trait seam, and the storage interface for persisted ratings.

pub mod calculator;
pub mod glicko;
pub mod storage;

// Re-export commonly used types
pub use calculator::{NoOpRatingCalculator, RatingCalculator};
pub use glicko::Glicko2RatingCalculator;
pub use storage::{InMemoryRatingStorage, RatingEntry, RatingStorage};
