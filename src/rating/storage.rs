//! Rating storage interface and implementations
//!
//! This module defines the collaborator boundary for persisting player
//! ratings. The engine itself never touches storage; hosts read a player's
//! triple before a match-completion event and persist the returned triple
//! after. The store also carries the legacy persistence quirk of keeping
//! volatility as a textual decimal, which is why degenerate values can reach
//! the calculator in the first place.
//!
//! Consecutive updates for one player are not commutative; serializing
//! concurrent updates per player is this layer's obligation, not the
//! calculator's.

use crate::types::{PlayerId, PlayerRating};
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage entry for a player's rating with metadata
///
/// `volatility` is stored as text, exactly as the external database column
/// does. Reading it back can therefore fail to parse; the calculator
/// substitutes its safe default when that happens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingEntry {
    pub player_id: PlayerId,
    pub rating: f64,
    pub rating_deviation: f64,
    pub volatility: String,
    pub matches_played: u64,
    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RatingEntry {
    /// Create a new rating entry for a new player
    pub fn new(player_id: PlayerId, initial_rating: PlayerRating) -> Self {
        let now = current_timestamp();
        Self {
            player_id,
            rating: initial_rating.rating,
            rating_deviation: initial_rating.rating_deviation,
            volatility: initial_rating.volatility.to_string(),
            matches_played: 0,
            last_updated: now,
            created_at: now,
        }
    }

    /// Reconstruct the numeric rating triple for the calculator
    ///
    /// A volatility string that fails to parse yields NaN, which the
    /// calculator sanitizes to its default rather than erroring here.
    pub fn player_rating(&self) -> PlayerRating {
        PlayerRating {
            rating: self.rating,
            rating_deviation: self.rating_deviation,
            volatility: self.volatility.parse().unwrap_or(f64::NAN),
        }
    }

    /// Record a match result: store the updated triple and bump the counters
    pub fn record_result(&mut self, new_rating: PlayerRating) {
        self.rating = new_rating.rating;
        self.rating_deviation = new_rating.rating_deviation;
        self.volatility = new_rating.volatility.to_string();
        self.matches_played += 1;
        self.last_updated = current_timestamp();
    }
}

/// Trait for rating storage operations
pub trait RatingStorage: Send + Sync {
    /// Get a player's rating entry
    fn get_rating(&self, player_id: &PlayerId) -> crate::error::Result<Option<RatingEntry>>;

    /// Store or update a player's rating
    fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()>;

    /// Get ratings for multiple players
    fn get_ratings(
        &self,
        player_ids: &[PlayerId],
    ) -> crate::error::Result<HashMap<PlayerId, RatingEntry>>;

    /// Store multiple rating updates atomically
    fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()>;

    /// Get all players with ratings (for admin views and export)
    fn all_ratings(&self) -> crate::error::Result<HashMap<PlayerId, RatingEntry>>;

    /// Get total number of rated players
    fn player_count(&self) -> crate::error::Result<usize>;
}

/// In-memory rating storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRatingStorage {
    ratings: RwLock<HashMap<PlayerId, RatingEntry>>,
}

impl InMemoryRatingStorage {
    /// Create a new empty in-memory rating storage
    pub fn new() -> Self {
        Self::default()
    }
}

impl RatingStorage for InMemoryRatingStorage {
    fn get_rating(&self, player_id: &PlayerId) -> crate::error::Result<Option<RatingEntry>> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| crate::error::RatingError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;

        Ok(ratings.get(player_id).cloned())
    }

    fn store_rating(&self, entry: RatingEntry) -> crate::error::Result<()> {
        let mut ratings =
            self.ratings
                .write()
                .map_err(|_| crate::error::RatingError::InternalError {
                    message: "Failed to acquire ratings write lock".to_string(),
                })?;

        ratings.insert(entry.player_id.clone(), entry);
        Ok(())
    }

    fn get_ratings(
        &self,
        player_ids: &[PlayerId],
    ) -> crate::error::Result<HashMap<PlayerId, RatingEntry>> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| crate::error::RatingError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;

        let mut result = HashMap::new();
        for player_id in player_ids {
            if let Some(entry) = ratings.get(player_id) {
                result.insert(player_id.clone(), entry.clone());
            }
        }

        Ok(result)
    }

    fn store_ratings(&self, entries: Vec<RatingEntry>) -> crate::error::Result<()> {
        let mut ratings =
            self.ratings
                .write()
                .map_err(|_| crate::error::RatingError::InternalError {
                    message: "Failed to acquire ratings write lock".to_string(),
                })?;

        for entry in entries {
            ratings.insert(entry.player_id.clone(), entry);
        }

        Ok(())
    }

    fn all_ratings(&self) -> crate::error::Result<HashMap<PlayerId, RatingEntry>> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| crate::error::RatingError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;

        Ok(ratings.clone())
    }

    fn player_count(&self) -> crate::error::Result<usize> {
        let ratings = self
            .ratings
            .read()
            .map_err(|_| crate::error::RatingError::InternalError {
                message: "Failed to acquire ratings read lock".to_string(),
            })?;

        Ok(ratings.len())
    }
}

/// Render all stored ratings as a CSV document
///
/// One `Name,Rating,RD,Volatility` header plus one line per player, sorted by
/// rating descending so the leaderboard reads top-down.
pub fn export_csv(storage: &dyn RatingStorage) -> crate::error::Result<String> {
    let ratings = storage.all_ratings()?;

    let mut entries: Vec<&RatingEntry> = ratings.values().collect();
    entries.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut csv = String::from("Name,Rating,RD,Volatility\n");
    for entry in entries {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            entry.player_id, entry.rating, entry.rating_deviation, entry.volatility
        ));
    }

    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry(player_id: &str, rating: f64) -> RatingEntry {
        RatingEntry::new(
            player_id.to_string(),
            PlayerRating::new(rating, 350.0, 0.06),
        )
    }

    #[test]
    fn test_entry_creation() {
        let entry = create_test_entry("player1", 1500.0);
        assert_eq!(entry.player_id, "player1");
        assert_eq!(entry.rating, 1500.0);
        assert_eq!(entry.volatility, "0.06");
        assert_eq!(entry.matches_played, 0);
    }

    #[test]
    fn test_entry_round_trips_volatility_text() {
        let entry = create_test_entry("player1", 1500.0);
        let triple = entry.player_rating();

        assert_eq!(triple.rating, 1500.0);
        assert_eq!(triple.rating_deviation, 350.0);
        assert_eq!(triple.volatility, 0.06);
    }

    #[test]
    fn test_unparsable_volatility_yields_nan() {
        let mut entry = create_test_entry("player1", 1500.0);
        entry.volatility = "not-a-number".to_string();

        let triple = entry.player_rating();
        assert!(triple.volatility.is_nan());
    }

    #[test]
    fn test_record_result() {
        let mut entry = create_test_entry("player1", 1500.0);
        let before = entry.last_updated;

        entry.record_result(PlayerRating::new(1512.5, 259.0, 0.0601));

        assert_eq!(entry.rating, 1512.5);
        assert_eq!(entry.rating_deviation, 259.0);
        assert_eq!(entry.volatility, "0.0601");
        assert_eq!(entry.matches_played, 1);
        assert!(entry.last_updated >= before);
    }

    #[test]
    fn test_in_memory_storage_basic_operations() {
        let storage = InMemoryRatingStorage::new();
        let entry = create_test_entry("player1", 1500.0);

        assert!(storage
            .get_rating(&"player1".to_string())
            .unwrap()
            .is_none());

        storage.store_rating(entry).unwrap();

        let retrieved = storage.get_rating(&"player1".to_string()).unwrap().unwrap();
        assert_eq!(retrieved.player_id, "player1");
        assert_eq!(retrieved.rating, 1500.0);
        assert_eq!(storage.player_count().unwrap(), 1);
    }

    #[test]
    fn test_bulk_operations() {
        let storage = InMemoryRatingStorage::new();

        let entries = vec![
            create_test_entry("player1", 1500.0),
            create_test_entry("player2", 1600.0),
            create_test_entry("player3", 1400.0),
        ];
        storage.store_ratings(entries).unwrap();

        let player_ids = vec![
            "player1".to_string(),
            "player2".to_string(),
            "missing".to_string(),
        ];
        let retrieved = storage.get_ratings(&player_ids).unwrap();

        assert_eq!(retrieved.len(), 2);
        assert!(retrieved.contains_key("player1"));
        assert!(retrieved.contains_key("player2"));
        assert_eq!(storage.all_ratings().unwrap().len(), 3);
    }

    #[test]
    fn test_csv_export() {
        let storage = InMemoryRatingStorage::new();
        storage
            .store_ratings(vec![
                create_test_entry("anna", 1450.0),
                create_test_entry("bruno", 1620.0),
            ])
            .unwrap();

        let csv = export_csv(&storage).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Name,Rating,RD,Volatility");
        // Sorted by rating descending
        assert!(lines[1].starts_with("bruno,1620,"));
        assert!(lines[2].starts_with("anna,1450,"));
    }
}
