//! Score history
//!
//! Persisted to LocalStorage as one list of records across all games.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, SCORES_KEY, StoreError};

/// A single finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score_id: String,
    pub game_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub score_value: u32,
    /// Unix timestamp (ms) when recorded
    pub timestamp: f64,
    /// Play time in whole seconds
    pub game_duration: u32,
    /// Beat every earlier score for this game when recorded
    pub is_high_score: bool,
}

/// Totals across all games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreStats {
    pub games_played: usize,
    pub total_score: u64,
    pub high_scores: usize,
}

/// All recorded scores, in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBook {
    pub records: Vec<ScoreRecord>,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Best score for a game, 0 if it was never played
    pub fn high_score(&self, game_id: &str) -> u32 {
        self.records
            .iter()
            .filter(|r| r.game_id == game_id)
            .map(|r| r.score_value)
            .max()
            .unwrap_or(0)
    }

    /// Append a record. The high score flag is decided from the records that
    /// existed before this one.
    pub fn record(
        &mut self,
        game_id: &str,
        score_value: u32,
        game_duration: u32,
        timestamp: f64,
        profile_id: Option<String>,
    ) -> ScoreRecord {
        let is_high_score = score_value > self.high_score(game_id);
        let record = ScoreRecord {
            score_id: format!("score_{}_{}", timestamp as u64, self.records.len()),
            game_id: game_id.to_string(),
            profile_id,
            score_value,
            timestamp,
            game_duration,
            is_high_score,
        };
        self.records.push(record.clone());
        record
    }

    /// Records for one game, best first
    pub fn for_game(&self, game_id: &str) -> Vec<&ScoreRecord> {
        let mut scores: Vec<&ScoreRecord> =
            self.records.iter().filter(|r| r.game_id == game_id).collect();
        scores.sort_by(|a, b| b.score_value.cmp(&a.score_value));
        scores
    }

    /// Every record, best first
    pub fn all_sorted(&self) -> Vec<&ScoreRecord> {
        let mut scores: Vec<&ScoreRecord> = self.records.iter().collect();
        scores.sort_by(|a, b| b.score_value.cmp(&a.score_value));
        scores
    }

    pub fn stats(&self) -> ScoreStats {
        let mut games: Vec<&str> = self.records.iter().map(|r| r.game_id.as_str()).collect();
        games.sort_unstable();
        games.dedup();
        ScoreStats {
            games_played: games.len(),
            total_score: self.records.iter().map(|r| r.score_value as u64).sum(),
            high_scores: self.records.iter().filter(|r| r.is_high_score).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let book: ScoreBook = persistence::load_json(store, SCORES_KEY);
        log::debug!("Loaded {} score records", book.records.len());
        book
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        persistence::save_json(store, SCORES_KEY, self)?;
        log::debug!("Scores saved ({} records)", self.records.len());
        Ok(())
    }

    /// Delete every stored score
    pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) {
        store.remove(SCORES_KEY);
    }
}

/// Best stored score for a game
pub fn get_high_score<S: KeyValueStore + ?Sized>(store: &S, game_id: &str) -> u32 {
    ScoreBook::load(store).high_score(game_id)
}

/// Read prior records, stamp the new one, then write it back
pub fn record_score<S: KeyValueStore + ?Sized>(
    store: &mut S,
    game_id: &str,
    score_value: u32,
    game_duration: u32,
    timestamp: f64,
) -> Result<ScoreRecord, StoreError> {
    let mut book = ScoreBook::load(store);
    let profile_id = crate::profile::UserProfile::load(store).map(|p| p.profile_id);
    let record = book.record(game_id, score_value, game_duration, timestamp, profile_id);
    book.save(store)?;
    if record.is_high_score {
        log::info!("New high score for {}: {}", game_id, score_value);
    }
    Ok(record)
}

/// Format a timestamp as a relative date string
pub fn format_date(timestamp: f64, now: f64) -> String {
    let diff_secs = (now - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_high_score_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(get_high_score(&store, "snake"), 0);
    }

    #[test]
    fn test_consecutive_records() {
        let mut store = MemoryStore::new();
        let first = record_score(&mut store, "snake", 100, 30, 1_000.0).unwrap();
        let second = record_score(&mut store, "snake", 150, 40, 2_000.0).unwrap();
        assert!(first.is_high_score);
        assert!(second.is_high_score);
        assert_eq!(get_high_score(&store, "snake"), 150);
    }

    #[test]
    fn test_lower_or_equal_is_not_high() {
        let mut store = MemoryStore::new();
        record_score(&mut store, "2048", 500, 0, 0.0).unwrap();
        let equal = record_score(&mut store, "2048", 500, 0, 1.0).unwrap();
        let lower = record_score(&mut store, "2048", 20, 0, 2.0).unwrap();
        assert!(!equal.is_high_score);
        assert!(!lower.is_high_score);
    }

    #[test]
    fn test_games_tracked_separately() {
        let mut store = MemoryStore::new();
        record_score(&mut store, "snake", 300, 0, 0.0).unwrap();
        let other = record_score(&mut store, "breakout", 10, 0, 1.0).unwrap();
        assert!(other.is_high_score);
        assert_eq!(get_high_score(&store, "breakout"), 10);
    }

    #[test]
    fn test_flag_not_recomputed() {
        let mut book = ScoreBook::new();
        book.record("memory", 900, 0, 0.0, None);
        book.record("memory", 950, 0, 1.0, None);
        assert!(book.records.iter().all(|r| r.is_high_score));
        assert_eq!(book.for_game("memory")[0].score_value, 950);
    }

    #[test]
    fn test_stats() {
        let mut book = ScoreBook::new();
        book.record("snake", 10, 0, 0.0, None);
        book.record("snake", 5, 0, 1.0, None);
        book.record("2048", 40, 0, 2.0, None);
        let stats = book.stats();
        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.total_score, 55);
        assert_eq!(stats.high_scores, 2);
        assert_eq!(book.all_sorted()[0].score_value, 40);
    }

    #[test]
    fn test_malformed_history_reads_empty() {
        let mut store = MemoryStore::new();
        store.set(SCORES_KEY, "[{\"broken\": true}]").unwrap();
        assert!(ScoreBook::load(&store).is_empty());
        let record = record_score(&mut store, "snake", 1, 0, 0.0).unwrap();
        assert!(record.is_high_score);
    }

    #[test]
    fn test_format_date() {
        let now = 10.0 * 24.0 * 3600.0 * 1000.0;
        assert_eq!(format_date(now - 5_000.0, now), "Just now");
        assert_eq!(format_date(now - 61_000.0, now), "1 min ago");
        assert_eq!(format_date(now - 3.0 * 3_600_000.0, now), "3 hours ago");
        assert_eq!(format_date(now - 25.0 * 3_600_000.0, now), "Yesterday");
    }
}
