//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed per-step movement, never wall-clock scaled
//! - Only the engine's own methods mutate its state
//! - No rendering, storage or platform dependencies

pub mod bounce;
pub mod engine;
pub mod grid;
pub mod pairs;
pub mod snake;
pub mod tiles;

pub use bounce::{Ball, Breakout, BreakoutSnapshot, Brick, Paddle, Rect};
pub use engine::{AnyEngine, Engine, GameKind, Input, Schedule, Snapshot};
pub use grid::{Coord, Direction, Outcome};
pub use pairs::{Card, MemoryGame, MemorySnapshot, PairPhase, symbol_glyph};
pub use snake::{SnakeGame, SnakeSnapshot};
pub use tiles::{Grid, SlideResult, TileBoard, TilesSnapshot, can_move, slide};
