//! Common engine interface
//!
//! The four games share no state layout. `Engine` covers only what a host
//! needs: build from a seed, feed input, advance time, ask whether it is
//! over, and take a snapshot for drawing.

use serde::{Deserialize, Serialize};

use super::bounce::{Breakout, BreakoutSnapshot};
use super::grid::{Direction, Outcome};
use super::pairs::{MemoryGame, MemorySnapshot};
use super::snake::{SnakeGame, SnakeSnapshot};
use super::tiles::{TileBoard, TilesSnapshot};
use crate::consts;

/// What drives an engine's `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Once per animation frame
    EveryFrame,
    /// Fixed timer period
    Interval { period_ms: u32 },
    /// Only input changes the game; elapsed time is passed to `step` for delays
    OnInput,
}

/// Catalog entry for each playable game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Snake,
    Memory,
    Breakout,
    Tiles,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Snake,
        GameKind::Memory,
        GameKind::Breakout,
        GameKind::Tiles,
    ];

    /// Stable id used for storage keys and score records
    pub fn id(&self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Memory => "memory",
            GameKind::Breakout => "breakout",
            GameKind::Tiles => "2048",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Snake => "Snake Classic",
            GameKind::Memory => "Memory Match",
            GameKind::Breakout => "Breakout",
            GameKind::Tiles => "2048",
        }
    }

    pub fn schedule(&self) -> Schedule {
        match self {
            GameKind::Snake => Schedule::Interval {
                period_ms: consts::snake::TICK_MS,
            },
            GameKind::Breakout => Schedule::EveryFrame,
            GameKind::Memory | GameKind::Tiles => Schedule::OnInput,
        }
    }
}

/// Discrete input routed to an engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Directional key (2048 slide, snake turn, breakout nudge)
    Move(Direction),
    /// Absolute paddle centre from a pointer
    PaddleTo(f32),
    /// Relative paddle move
    PaddleBy(f32),
    /// Flip a memory card
    Reveal(usize),
}

pub trait Engine {
    type Snapshot;

    fn new(seed: u64) -> Self
    where
        Self: Sized;

    /// Apply one input; returns false when it was ignored
    fn apply(&mut self, input: Input) -> bool;

    /// Advance time. Frame and timer driven engines ignore `dt_ms`.
    fn step(&mut self, dt_ms: u32);

    fn outcome(&self) -> Option<Outcome>;

    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    fn score(&self) -> u32;

    fn snapshot(&self) -> Self::Snapshot;
}

impl Engine for TileBoard {
    type Snapshot = TilesSnapshot;

    fn new(seed: u64) -> Self {
        TileBoard::new(seed)
    }

    fn apply(&mut self, input: Input) -> bool {
        match input {
            Input::Move(dir) => self.shift(dir).moved,
            _ => false,
        }
    }

    fn step(&mut self, _dt_ms: u32) {}

    fn outcome(&self) -> Option<Outcome> {
        TileBoard::outcome(self)
    }

    fn score(&self) -> u32 {
        TileBoard::score(self)
    }

    fn snapshot(&self) -> TilesSnapshot {
        TileBoard::snapshot(self)
    }
}

impl Engine for Breakout {
    type Snapshot = BreakoutSnapshot;

    fn new(_seed: u64) -> Self {
        Breakout::new()
    }

    fn apply(&mut self, input: Input) -> bool {
        if self.is_terminal() {
            return false;
        }
        match input {
            Input::PaddleTo(x) => self.set_paddle_center(x),
            Input::PaddleBy(dx) => self.nudge_paddle(dx),
            Input::Move(Direction::Left) => self.nudge_paddle(-consts::breakout::PADDLE_KEY_STEP),
            Input::Move(Direction::Right) => self.nudge_paddle(consts::breakout::PADDLE_KEY_STEP),
            _ => return false,
        }
        true
    }

    fn step(&mut self, _dt_ms: u32) {
        Breakout::step(self);
    }

    fn outcome(&self) -> Option<Outcome> {
        Breakout::outcome(self)
    }

    fn score(&self) -> u32 {
        Breakout::score(self)
    }

    fn snapshot(&self) -> BreakoutSnapshot {
        Breakout::snapshot(self)
    }
}

impl Engine for SnakeGame {
    type Snapshot = SnakeSnapshot;

    fn new(seed: u64) -> Self {
        SnakeGame::new(seed)
    }

    fn apply(&mut self, input: Input) -> bool {
        match input {
            Input::Move(dir) => self.steer(dir),
            _ => false,
        }
    }

    fn step(&mut self, _dt_ms: u32) {
        SnakeGame::step(self);
    }

    fn outcome(&self) -> Option<Outcome> {
        SnakeGame::outcome(self)
    }

    fn score(&self) -> u32 {
        SnakeGame::score(self)
    }

    fn snapshot(&self) -> SnakeSnapshot {
        SnakeGame::snapshot(self)
    }
}

impl Engine for MemoryGame {
    type Snapshot = MemorySnapshot;

    fn new(seed: u64) -> Self {
        MemoryGame::new(seed)
    }

    fn apply(&mut self, input: Input) -> bool {
        match input {
            Input::Reveal(id) => self.reveal(id),
            _ => false,
        }
    }

    fn step(&mut self, dt_ms: u32) {
        MemoryGame::step(self, dt_ms);
    }

    fn outcome(&self) -> Option<Outcome> {
        MemoryGame::outcome(self)
    }

    fn score(&self) -> u32 {
        MemoryGame::score(self)
    }

    fn snapshot(&self) -> MemorySnapshot {
        MemoryGame::snapshot(self)
    }
}

/// Snapshot of whichever game is running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Snapshot {
    Tiles(TilesSnapshot),
    Breakout(BreakoutSnapshot),
    Snake(SnakeSnapshot),
    Memory(MemorySnapshot),
}

/// One engine of any kind
#[derive(Debug, Clone)]
pub enum AnyEngine {
    Tiles(TileBoard),
    Breakout(Breakout),
    Snake(SnakeGame),
    Memory(MemoryGame),
}

impl AnyEngine {
    pub fn create(kind: GameKind, seed: u64) -> Self {
        match kind {
            GameKind::Tiles => AnyEngine::Tiles(TileBoard::new(seed)),
            GameKind::Breakout => AnyEngine::Breakout(Breakout::new()),
            GameKind::Snake => AnyEngine::Snake(SnakeGame::new(seed)),
            GameKind::Memory => AnyEngine::Memory(MemoryGame::new(seed)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            AnyEngine::Tiles(_) => GameKind::Tiles,
            AnyEngine::Breakout(_) => GameKind::Breakout,
            AnyEngine::Snake(_) => GameKind::Snake,
            AnyEngine::Memory(_) => GameKind::Memory,
        }
    }

    pub fn apply(&mut self, input: Input) -> bool {
        match self {
            AnyEngine::Tiles(e) => e.apply(input),
            AnyEngine::Breakout(e) => e.apply(input),
            AnyEngine::Snake(e) => e.apply(input),
            AnyEngine::Memory(e) => e.apply(input),
        }
    }

    pub fn step(&mut self, dt_ms: u32) {
        match self {
            AnyEngine::Tiles(e) => Engine::step(e, dt_ms),
            AnyEngine::Breakout(e) => Engine::step(e, dt_ms),
            AnyEngine::Snake(e) => Engine::step(e, dt_ms),
            AnyEngine::Memory(e) => Engine::step(e, dt_ms),
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            AnyEngine::Tiles(e) => Engine::outcome(e),
            AnyEngine::Breakout(e) => Engine::outcome(e),
            AnyEngine::Snake(e) => Engine::outcome(e),
            AnyEngine::Memory(e) => Engine::outcome(e),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn score(&self) -> u32 {
        match self {
            AnyEngine::Tiles(e) => Engine::score(e),
            AnyEngine::Breakout(e) => Engine::score(e),
            AnyEngine::Snake(e) => Engine::score(e),
            AnyEngine::Memory(e) => Engine::score(e),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        match self {
            AnyEngine::Tiles(e) => Snapshot::Tiles(e.snapshot()),
            AnyEngine::Breakout(e) => Snapshot::Breakout(e.snapshot()),
            AnyEngine::Snake(e) => Snapshot::Snake(e.snapshot()),
            AnyEngine::Memory(e) => Snapshot::Memory(e.snapshot()),
        }
    }
}
