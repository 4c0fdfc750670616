//! Rating system configuration
//!
//! Process-wide tunables read by every rating calculation. The calculator
//! itself accepts whatever it is handed (an out-of-range k-factor produces a
//! nonsensical but finite update); `validate_settings` exists for callers
//! that want range checks before applying admin input.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::RatingError;

fn config_error(message: impl Into<String>) -> anyhow::Error {
    RatingError::ConfigurationError {
        message: message.into(),
    }
    .into()
}

/// How strongly the point margin of a match amplifies a rating change
///
/// Selects the multiplier applied to the log-scaled margin factor:
/// 0.5x for `Low`, 1.0x for `Normal`, 2.0x for `High`. Unrecognized strings
/// deserialize as `Normal` rather than erroring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum VictoryMarginWeight {
    Low,
    #[default]
    Normal,
    High,
}

impl VictoryMarginWeight {
    /// Weight multiplier applied to the log-scaled point-margin factor
    pub fn multiplier(&self) -> f64 {
        match self {
            VictoryMarginWeight::Low => 0.5,
            VictoryMarginWeight::Normal => 1.0,
            VictoryMarginWeight::High => 2.0,
        }
    }
}

impl FromStr for VictoryMarginWeight {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "low" => VictoryMarginWeight::Low,
            "high" => VictoryMarginWeight::High,
            // "normal" and anything unrecognized fall back to the base
            // multiplier
            _ => VictoryMarginWeight::Normal,
        })
    }
}

impl From<String> for VictoryMarginWeight {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for VictoryMarginWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VictoryMarginWeight::Low => write!(f, "low"),
            VictoryMarginWeight::Normal => write!(f, "normal"),
            VictoryMarginWeight::High => write!(f, "high"),
        }
    }
}

/// Tunable settings for rating calculations
///
/// Mutated only through an admin action; every calculation reads one snapshot
/// at call start, last write wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSettings {
    /// Flat rating bonus awarded to the daily MVP
    pub daily_bonus_amount: f64,
    /// Learning-rate scale; 32 is neutral and every swing scales as
    /// `k_factor / 32`
    pub k_factor: f64,
    /// Starting rating for new players
    pub initial_rating: f64,
    /// Point-margin amplification tier
    pub victory_margin_weight: VictoryMarginWeight,
}

impl Default for RatingSettings {
    fn default() -> Self {
        // The aggressive historical variant; a neutral configuration is
        // k_factor 32 with the Normal weight tier
        Self {
            daily_bonus_amount: 15.0,
            k_factor: 200.0,
            initial_rating: 1500.0,
            victory_margin_weight: VictoryMarginWeight::High,
        }
    }
}

impl RatingSettings {
    /// Load settings from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();

        if let Ok(bonus) = env::var("RATING_DAILY_BONUS_AMOUNT") {
            settings.daily_bonus_amount = bonus
                .parse()
                .map_err(|_| config_error(format!("Invalid RATING_DAILY_BONUS_AMOUNT value: {}", bonus)))?;
        }
        if let Ok(k_factor) = env::var("RATING_K_FACTOR") {
            settings.k_factor = k_factor
                .parse()
                .map_err(|_| config_error(format!("Invalid RATING_K_FACTOR value: {}", k_factor)))?;
        }
        if let Ok(initial) = env::var("RATING_INITIAL_RATING") {
            settings.initial_rating = initial
                .parse()
                .map_err(|_| config_error(format!("Invalid RATING_INITIAL_RATING value: {}", initial)))?;
        }
        if let Ok(weight) = env::var("RATING_VICTORY_MARGIN_WEIGHT") {
            // Unrecognized tiers read as Normal, matching the wire behavior
            settings.victory_margin_weight = weight.parse().unwrap_or_default();
        }

        Ok(settings)
    }
}

/// Validate settings values on behalf of callers
///
/// The calculator never performs these checks itself; admin surfaces are
/// expected to call this before `update_settings`.
pub fn validate_settings(settings: &RatingSettings) -> Result<()> {
    if settings.k_factor <= 0.0 {
        return Err(config_error("K-factor must be positive"));
    }
    if settings.initial_rating <= 0.0 {
        return Err(config_error("Initial rating must be positive"));
    }
    if settings.daily_bonus_amount < 0.0 {
        return Err(config_error("Daily bonus amount cannot be negative"));
    }

    Ok(())
}
