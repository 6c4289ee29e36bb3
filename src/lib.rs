//! Game Hub - a catalog of small browser games
//!
//! Core modules:
//! - `sim`: Deterministic simulation engines (2048, Breakout, Snake, Memory Match)
//! - `host`: Session loop that schedules engine steps and records results
//! - `persistence`: Key-value store abstraction (LocalStorage on web)
//! - `scores`: Score history and high score bookkeeping
//! - `profile`: Player profile and preferences
//! - `catalog`: Game list and play counts
//! - `view`: Text projection of engine snapshots

pub mod catalog;
pub mod host;
pub mod persistence;
pub mod platform;
pub mod profile;
pub mod scores;
pub mod sim;
pub mod view;

pub use host::{Session, SessionPhase};
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use profile::{Theme, UserProfile};
pub use scores::{ScoreBook, ScoreRecord};
pub use sim::{AnyEngine, Engine, GameKind, Input, Outcome, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Host loop: maximum interval steps replayed in one `advance` call
    pub const MAX_CATCHUP_STEPS: u32 = 8;

    /// 2048 tile game
    pub mod tiles {
        /// Board edge length
        pub const GRID_SIZE: usize = 4;
        /// Tiles placed at game start
        pub const STARTING_TILES: usize = 2;
        /// Chance a spawned tile is a 2 (otherwise 4)
        pub const TWO_PROBABILITY: f64 = 0.9;
    }

    /// Snake
    pub mod snake {
        /// Board edge length (cells); the board wraps around
        pub const GRID_SIZE: i32 = 20;
        /// Starting head cell
        pub const START: (i32, i32) = (10, 10);
        /// Tick period in milliseconds
        pub const TICK_MS: u32 = 150;
        /// Points per food eaten
        pub const FOOD_POINTS: u32 = 10;
    }

    /// Breakout
    pub mod breakout {
        pub const FIELD_WIDTH: f32 = 600.0;
        pub const FIELD_HEIGHT: f32 = 500.0;

        pub const PADDLE_WIDTH: f32 = 100.0;
        pub const PADDLE_HEIGHT: f32 = 15.0;
        /// Gap between paddle bottom and field bottom
        pub const PADDLE_MARGIN: f32 = 10.0;

        pub const BALL_RADIUS: f32 = 8.0;
        /// Ball spawn point (x, y)
        pub const BALL_START: (f32, f32) = (FIELD_WIDTH / 2.0, FIELD_HEIGHT - 50.0);
        /// Per-frame displacement (dx, dy)
        pub const BALL_VELOCITY: (f32, f32) = (3.0, -3.0);

        pub const BRICK_ROWS: usize = 5;
        pub const BRICK_COLS: usize = 8;
        pub const BRICK_WIDTH: f32 = 70.0;
        pub const BRICK_HEIGHT: f32 = 20.0;
        pub const BRICK_PADDING: f32 = 5.0;
        pub const BRICK_OFFSET_TOP: f32 = 50.0;
        pub const BRICK_OFFSET_LEFT: f32 = 15.0;
        pub const BRICK_POINTS: u32 = 10;

        /// Keyboard paddle nudge per key press
        pub const PADDLE_KEY_STEP: f32 = 25.0;
    }

    /// Memory Match
    pub mod memory {
        /// Distinct symbols (the deck holds two of each)
        pub const SYMBOLS: [&str; 8] = ["🎮", "🎯", "🎨", "🎭", "🎪", "🎸", "🎺", "🎹"];
        /// Delay before a matching pair is locked in
        pub const MATCH_DELAY_MS: u32 = 500;
        /// Delay before a mismatched pair is turned back over
        pub const MISMATCH_DELAY_MS: u32 = 1000;
        pub const BASE_SCORE: u32 = 1000;
        pub const MOVE_PENALTY: u32 = 10;
    }
}
