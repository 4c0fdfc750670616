//! Rating calculator trait and implementations
//!
//! This module defines the interface for rating calculations. The production
//! implementation is [`crate::rating::glicko::Glicko2RatingCalculator`]; a
//! no-op implementation is provided for testing and fallback wiring.

use crate::config::RatingSettings;
use crate::types::PlayerRating;

/// Trait for calculating updated player ratings after a match
///
/// A calculation never fails: implementations must return a finite, valid
/// rating triple for every input, substituting documented fallbacks for
/// degenerate data. Rating math must never be the reason a match-completion
/// request fails.
pub trait RatingCalculator: Send + Sync {
    /// Calculate the subject's updated rating after one match
    ///
    /// # Arguments
    /// * `player` - Current rating triple of the subject
    /// * `opponents` - One entry per opposing contributor; either each
    ///   opposing player individually or a single synthesized team average
    /// * `scores` - Outcome against each opponent entry: 1.0 win, 0.5 draw,
    ///   0.0 loss
    /// * `point_diffs` - Non-negative point margin associated with each
    ///   opponent entry
    fn calculate_new_rating(
        &self,
        player: &PlayerRating,
        opponents: &[PlayerRating],
        scores: &[f64],
        point_diffs: &[f64],
    ) -> PlayerRating;

    /// Get the rating assigned to players with no prior record
    fn initial_rating(&self) -> PlayerRating;

    /// Get a copy of the current settings snapshot
    fn settings(&self) -> RatingSettings;

    /// Replace the settings record
    ///
    /// No validation is performed here; callers wanting range checks use
    /// [`crate::config::validate_settings`] first.
    fn update_settings(&mut self, settings: RatingSettings);
}

/// Simple rating calculator for testing or fallback: ratings never move
#[derive(Debug, Clone, Default)]
pub struct NoOpRatingCalculator {
    settings: RatingSettings,
}

impl NoOpRatingCalculator {
    /// Create a new no-op rating calculator
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }
}

impl RatingCalculator for NoOpRatingCalculator {
    fn calculate_new_rating(
        &self,
        player: &PlayerRating,
        _opponents: &[PlayerRating],
        _scores: &[f64],
        _point_diffs: &[f64],
    ) -> PlayerRating {
        *player
    }

    fn initial_rating(&self) -> PlayerRating {
        PlayerRating::new(self.settings.initial_rating, 350.0, 0.06)
    }

    fn settings(&self) -> RatingSettings {
        self.settings
    }

    fn update_settings(&mut self, settings: RatingSettings) {
        self.settings = settings;
    }
}
