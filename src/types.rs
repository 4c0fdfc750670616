//! Common types used throughout the rating service

use serde::{Deserialize, Serialize};

/// Unique identifier for players
pub type PlayerId = String;

/// Score value for winning a match
pub const SCORE_WIN: f64 = 1.0;

/// Score value for a drawn match (supported by the formula; the volleyball
/// domain never produces one)
pub const SCORE_DRAW: f64 = 0.5;

/// Score value for losing a match
pub const SCORE_LOSS: f64 = 0.0;

/// Rating information for a player
///
/// All three fields live on the display scale: `rating` clusters around 1500,
/// `rating_deviation` starts at 350 and shrinks with observed matches, and
/// `volatility` starts at 0.06. Deviation and volatility are expected to be
/// positive; the calculator substitutes safe defaults when historical data
/// violates that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub rating: f64,
    pub rating_deviation: f64,
    pub volatility: f64,
}

impl Default for PlayerRating {
    fn default() -> Self {
        Self {
            rating: 1500.0,
            rating_deviation: 350.0,
            volatility: 0.06,
        }
    }
}

impl PlayerRating {
    /// Create a rating triple from raw components
    pub fn new(rating: f64, rating_deviation: f64, volatility: f64) -> Self {
        Self {
            rating,
            rating_deviation,
            volatility,
        }
    }
}

/// Rating change information for a player after a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub old_rating: PlayerRating,
    pub new_rating: PlayerRating,
}

impl RatingChange {
    /// Signed rating delta for this change
    pub fn delta(&self) -> f64 {
        self.new_rating.rating - self.old_rating.rating
    }
}

/// Synthesize a single "team" opponent by arithmetic averaging of teammates'
/// rating triples
///
/// Callers may pass either each opposing player individually or one averaged
/// entry to the calculator; both forms are supported. Returns `None` for an
/// empty team.
pub fn team_average(teammates: &[PlayerRating]) -> Option<PlayerRating> {
    if teammates.is_empty() {
        return None;
    }

    let n = teammates.len() as f64;
    Some(PlayerRating {
        rating: teammates.iter().map(|r| r.rating).sum::<f64>() / n,
        rating_deviation: teammates.iter().map(|r| r.rating_deviation).sum::<f64>() / n,
        volatility: teammates.iter().map(|r| r.volatility).sum::<f64>() / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_player_rating() {
        let rating = PlayerRating::default();
        assert_eq!(rating.rating, 1500.0);
        assert_eq!(rating.rating_deviation, 350.0);
        assert_eq!(rating.volatility, 0.06);
    }

    #[test]
    fn test_rating_change_delta() {
        let change = RatingChange {
            player_id: "player1".to_string(),
            old_rating: PlayerRating::new(1500.0, 350.0, 0.06),
            new_rating: PlayerRating::new(1525.0, 300.0, 0.06),
        };
        assert_eq!(change.delta(), 25.0);
    }

    #[test]
    fn test_team_average() {
        let team = vec![
            PlayerRating::new(1400.0, 300.0, 0.06),
            PlayerRating::new(1600.0, 100.0, 0.08),
        ];

        let avg = team_average(&team).unwrap();
        assert_eq!(avg.rating, 1500.0);
        assert_eq!(avg.rating_deviation, 200.0);
        assert!((avg.volatility - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_team_average_empty() {
        assert!(team_average(&[]).is_none());
    }
}
