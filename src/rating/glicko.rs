//! Glicko-2 derived rating calculator with victory-margin weighting
//!
//! This is the core of the crate: a single-match Glicko-2 update extended
//! with a log-scaled point-margin multiplier and a K-factor learning-rate
//! scale. Two things distinguish it from the published Glicko-2 algorithm:
//!
//! - The update equations run directly on display-scale rating/deviation
//!   numbers. There is no conversion to the internal Glicko-2 scale
//!   (deviation / 173.7178, rating centered at 0). This is preserved for
//!   behavioral compatibility with the system's historical ratings.
//! - Each match is its own rating period, persisted immediately; there is no
//!   multi-period batching.
//!
//! Every code path yields a finite, valid rating triple. Degenerate inputs
//! (non-positive or non-finite volatility, a zero variance denominator, a
//! diverging volatility solve) are recovered with documented fallbacks
//! instead of errors.

use crate::config::RatingSettings;
use crate::rating::calculator::RatingCalculator;
use crate::types::PlayerRating;
use tracing::{debug, warn};

/// Volatility constraint parameter for the volatility solve
const TAU: f64 = 0.5;

/// Convergence tolerance for the Illinois iteration
const EPSILON: f64 = 1e-6;

/// Hard cap on Illinois iterations; the solve is self-bounding
const MAX_ITERATIONS: u32 = 100;

/// Substituted whenever a volatility value is missing, non-finite, or
/// non-positive
const FALLBACK_VOLATILITY: f64 = 0.06;

/// Bounded rating nudge applied when the full update cannot be computed
const FALLBACK_NUDGE: f64 = 5.0;

/// Rating deviation assigned to brand-new players
const INITIAL_DEVIATION: f64 = 350.0;

/// K-factor value at which no amplification is applied
const K_FACTOR_BASELINE: f64 = 32.0;

/// The production rating calculator
///
/// Holds one injected settings record; each calculation reads it once at call
/// start. `update_settings` requires exclusive access, so hosts serving
/// concurrent match completions wrap the calculator in their own lock or
/// atomic swap.
#[derive(Debug, Clone, Default)]
pub struct Glicko2RatingCalculator {
    settings: RatingSettings,
}

/// `g(φ)` from the Glicko-2 system, applied to display-scale deviations
fn g(deviation: f64) -> f64 {
    1.0 / (1.0 + 3.0 * deviation.powi(2) / std::f64::consts::PI.powi(2)).sqrt()
}

/// Expected score of a player at `rating` against one opponent
fn expected(rating: f64, opponent_rating: f64, opponent_deviation: f64) -> f64 {
    1.0 / (1.0 + (-g(opponent_deviation) * (rating - opponent_rating) / 400.0).exp())
}

/// Replace a missing, non-finite, or non-positive volatility with the safe
/// default
///
/// Persisted historical data may contain degenerate values from prior bugs;
/// they must not poison the update.
fn sanitize_volatility(volatility: f64) -> f64 {
    if volatility.is_finite() && volatility > 0.0 {
        volatility
    } else {
        FALLBACK_VOLATILITY
    }
}

impl Glicko2RatingCalculator {
    /// Create a calculator with the given settings
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    /// Victory-margin multiplier for a point difference
    ///
    /// Log-scaled so the first few points matter most, then scaled by the
    /// configured weight tier.
    fn victory_margin_multiplier(&self, point_diff: f64) -> f64 {
        let base = (point_diff.abs() + 1.0).log10();
        base * self.settings.victory_margin_weight.multiplier()
    }

    /// Averaged win expectancy of `player` against a set of opponents
    ///
    /// Returns 0.5 when there are no opponents.
    pub fn expected_score(&self, player: &PlayerRating, opponents: &[PlayerRating]) -> f64 {
        if opponents.is_empty() {
            return 0.5;
        }

        let total: f64 = opponents
            .iter()
            .map(|opp| expected(player.rating, opp.rating, opp.rating_deviation))
            .sum();
        total / opponents.len() as f64
    }

    /// Apply the flat daily MVP bonus to a player's rating
    ///
    /// Deviation and volatility are untouched; the bonus is an award, not an
    /// observation.
    pub fn apply_daily_bonus(&self, player: &PlayerRating) -> PlayerRating {
        PlayerRating {
            rating: player.rating + self.settings.daily_bonus_amount,
            ..*player
        }
    }

    /// Bounded deterministic fallback: nudge the rating toward the observed
    /// result and keep the rest of the triple
    fn fallback_rating(player: &PlayerRating, volatility: f64, scores: &[f64]) -> PlayerRating {
        let won = scores.first().copied() == Some(1.0);
        let nudge = if won { FALLBACK_NUDGE } else { -FALLBACK_NUDGE };
        PlayerRating {
            rating: player.rating + nudge,
            rating_deviation: player.rating_deviation,
            volatility,
        }
    }

    /// Solve for the updated volatility with the Illinois variant of regula
    /// falsi
    ///
    /// Brackets at `A = ln(σ²)` and `B = ln(Δ² − φ² − v)` when that argument
    /// is positive, `A + τ` otherwise. Any non-finite intermediate yields the
    /// fallback volatility.
    fn solve_volatility(sigma: f64, delta: f64, v: f64, phi: f64) -> f64 {
        let a = (sigma * sigma).ln();
        if !a.is_finite() {
            return FALLBACK_VOLATILITY;
        }

        let f = |x: f64| {
            let e_x = x.exp();
            let num = e_x * (delta * delta - phi * phi - v - e_x);
            let den = 2.0 * (phi * phi + v + e_x).powi(2);
            num / den - (x - a) / (TAU * TAU)
        };

        let mut lower = a;
        let bracket = delta * delta - phi * phi - v;
        let mut upper = if bracket > 0.0 { bracket.ln() } else { lower + TAU };
        if upper < lower {
            upper = lower + TAU;
        }

        let mut f_lower = f(lower);
        let mut f_upper = f(upper);
        let mut iterations = 0;

        while (upper - lower).abs() > EPSILON && iterations < MAX_ITERATIONS {
            if !f_lower.is_finite() || !f_upper.is_finite() || f_upper == f_lower {
                return FALLBACK_VOLATILITY;
            }

            let c = lower + (lower - upper) * f_lower / (f_upper - f_lower);
            if !c.is_finite() {
                return FALLBACK_VOLATILITY;
            }
            let f_c = f(c);

            if f_c * f_upper < 0.0 {
                lower = upper;
                f_lower = f_upper;
            } else {
                // Illinois modification: halve the retained endpoint value
                f_lower /= 2.0;
            }
            upper = c;
            f_upper = f_c;
            iterations += 1;
        }

        let sigma_new = (lower / 2.0).exp();
        if sigma_new.is_finite() && sigma_new > 0.0 {
            sigma_new
        } else {
            FALLBACK_VOLATILITY
        }
    }

    /// The full update pipeline; `None` means "take the bounded fallback"
    fn try_calculate(
        &self,
        player: &PlayerRating,
        sigma: f64,
        opponents: &[PlayerRating],
        scores: &[f64],
        point_diffs: &[f64],
    ) -> Option<PlayerRating> {
        if opponents.is_empty()
            || opponents.len() != scores.len()
            || opponents.len() != point_diffs.len()
        {
            return None;
        }

        let mu = player.rating;
        let phi = player.rating_deviation;

        // v's denominator and the margin-weighted score sum share one pass
        let mut v_denominator = 0.0;
        let mut weighted_sum = 0.0;
        for ((opponent, score), point_diff) in opponents.iter().zip(scores).zip(point_diffs) {
            let g_i = g(opponent.rating_deviation);
            let e_i = expected(mu, opponent.rating, opponent.rating_deviation);
            v_denominator += g_i * g_i * e_i * (1.0 - e_i);
            weighted_sum += g_i * (*score - e_i) * self.victory_margin_multiplier(*point_diff);
        }

        // A single opponent whose expectancy saturates at 0 or 1 collapses
        // the denominator; treat it as "cannot improve the estimate"
        if !v_denominator.is_finite() || v_denominator <= 0.0 {
            return None;
        }
        let v = 1.0 / v_denominator;
        let delta = v * weighted_sum;
        if !delta.is_finite() {
            return None;
        }

        let sigma_new = Self::solve_volatility(sigma, delta, v, phi);

        let phi_star = (phi * phi + sigma_new * sigma_new).sqrt();
        let phi_new = 1.0 / (1.0 / (phi_star * phi_star) + 1.0 / v).sqrt();
        if !phi_new.is_finite() || phi_new <= 0.0 {
            return None;
        }

        // K-factor-scaled change instead of the plain Glicko-2 delta
        let k_mult = self.settings.k_factor / K_FACTOR_BASELINE;
        let rating_change = phi_new * phi_new * g(phi) * weighted_sum * k_mult;
        let mu_new = mu + rating_change;
        if !mu_new.is_finite() {
            return None;
        }

        Some(PlayerRating::new(mu_new, phi_new, sigma_new))
    }
}

impl RatingCalculator for Glicko2RatingCalculator {
    fn calculate_new_rating(
        &self,
        player: &PlayerRating,
        opponents: &[PlayerRating],
        scores: &[f64],
        point_diffs: &[f64],
    ) -> PlayerRating {
        debug!(
            current_rating = player.rating,
            opponent_count = opponents.len(),
            ?scores,
            ?point_diffs,
            "calculating new rating"
        );

        let sigma = sanitize_volatility(player.volatility);

        match self.try_calculate(player, sigma, opponents, scores, point_diffs) {
            Some(updated) => updated,
            None => {
                warn!(
                    current_rating = player.rating,
                    "rating update degenerate, applying bounded fallback"
                );
                Self::fallback_rating(player, sigma, scores)
            }
        }
    }

    fn initial_rating(&self) -> PlayerRating {
        PlayerRating::new(
            self.settings.initial_rating,
            INITIAL_DEVIATION,
            FALLBACK_VOLATILITY,
        )
    }

    fn settings(&self) -> RatingSettings {
        self.settings
    }

    fn update_settings(&mut self, settings: RatingSettings) {
        self.settings = settings;
    }
}
