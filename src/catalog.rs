//! Game catalog and play counts

use serde::{Deserialize, Serialize};

use crate::persistence::{self, GAMES_KEY, KeyValueStore, StoreError};
use crate::sim::GameKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Arcade,
    Puzzle,
    Strategy,
    Action,
    Casual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Static description of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameInfo {
    pub kind: GameKind,
    pub description: &'static str,
    pub category: Category,
    pub thumbnail: &'static str,
    pub difficulty: Difficulty,
}

impl GameInfo {
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

pub static GAMES: [GameInfo; 4] = [
    GameInfo {
        kind: GameKind::Snake,
        description: "Guide the snake to eat food and grow longer. Don't run into yourself!",
        category: Category::Arcade,
        thumbnail: "🐍",
        difficulty: Difficulty::Easy,
    },
    GameInfo {
        kind: GameKind::Memory,
        description: "Test your memory by matching pairs of cards. How quickly can you find them all?",
        category: Category::Puzzle,
        thumbnail: "🧠",
        difficulty: Difficulty::Easy,
    },
    GameInfo {
        kind: GameKind::Breakout,
        description: "Classic brick breaker game. Destroy all bricks with your ball and paddle!",
        category: Category::Arcade,
        thumbnail: "🧱",
        difficulty: Difficulty::Medium,
    },
    GameInfo {
        kind: GameKind::Tiles,
        description: "Slide numbered tiles to combine them and reach 2048. Simple yet addictive!",
        category: Category::Puzzle,
        thumbnail: "🔢",
        difficulty: Difficulty::Medium,
    },
];

pub fn find(game_id: &str) -> Option<&'static GameInfo> {
    GAMES.iter().find(|g| g.id() == game_id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayCount {
    pub game_id: String,
    pub play_count: u32,
}

/// Times each game was played to the end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayCounts {
    pub entries: Vec<PlayCount>,
}

impl PlayCounts {
    pub fn get(&self, game_id: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.game_id == game_id)
            .map(|e| e.play_count)
            .unwrap_or(0)
    }

    pub fn increment(&mut self, game_id: &str) -> u32 {
        match self.entries.iter_mut().find(|e| e.game_id == game_id) {
            Some(entry) => {
                entry.play_count += 1;
                entry.play_count
            }
            None => {
                self.entries.push(PlayCount {
                    game_id: game_id.to_string(),
                    play_count: 1,
                });
                1
            }
        }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        persistence::load_json(store, GAMES_KEY)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        persistence::save_json(store, GAMES_KEY, self)
    }
}

/// Bump and persist the play count for one game
pub fn record_play<S: KeyValueStore + ?Sized>(
    store: &mut S,
    game_id: &str,
) -> Result<u32, StoreError> {
    let mut counts = PlayCounts::load(store);
    let count = counts.increment(game_id);
    counts.save(store)?;
    Ok(count)
}
