//! 2048 tile-merge engine
//!
//! Every move is reduced to "slide left": the grid is turned so the requested
//! direction points left, each row is compacted and merged, and the grid is
//! turned back. A tile produced by a merge never merges again in the same move.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, Outcome};
use crate::consts::tiles::*;

/// Row-major square grid, 0 = empty
pub type Grid = Vec<Vec<u32>>;

/// Result of sliding a grid in one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideResult {
    pub grid: Grid,
    /// Sum of all tiles created by merges
    pub points: u32,
    /// Whether any cell changed
    pub moved: bool,
}

/// Clockwise quarter turns that make `dir` point left
fn quarter_turns(dir: Direction) -> usize {
    match dir {
        Direction::Left => 0,
        Direction::Down => 1,
        Direction::Right => 2,
        Direction::Up => 3,
    }
}

fn rotate_cw(grid: &Grid) -> Grid {
    let n = grid.len();
    let mut out = vec![vec![0; n]; n];
    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            out[c][n - 1 - r] = value;
        }
    }
    out
}

/// Equal tiles merge unless the result would not fit in a `u32`
fn can_merge(a: u32, b: u32) -> bool {
    a == b && a.checked_mul(2).is_some()
}

/// Compact a row to the left, merging the first equal pair of each run
fn merge_row(row: &[u32]) -> (Vec<u32>, u32) {
    let tiles: Vec<u32> = row.iter().copied().filter(|&v| v != 0).collect();
    let mut out = Vec::with_capacity(row.len());
    let mut points: u32 = 0;
    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && can_merge(tiles[i], tiles[i + 1]) {
            let merged = tiles[i] * 2;
            out.push(merged);
            points = points.saturating_add(merged);
            i += 2;
        } else {
            out.push(tiles[i]);
            i += 1;
        }
    }
    out.resize(row.len(), 0);
    (out, points)
}

/// Slide `grid` toward `dir` without spawning anything
pub fn slide(grid: &Grid, dir: Direction) -> SlideResult {
    let turns = quarter_turns(dir);
    let mut turned = grid.clone();
    for _ in 0..turns {
        turned = rotate_cw(&turned);
    }

    let mut points: u32 = 0;
    for row in turned.iter_mut() {
        let (merged, earned) = merge_row(row);
        *row = merged;
        points = points.saturating_add(earned);
    }

    for _ in 0..(4 - turns) % 4 {
        turned = rotate_cw(&turned);
    }

    let moved = turned != *grid;
    SlideResult {
        grid: turned,
        points,
        moved,
    }
}

/// True if some move can still change the grid
pub fn can_move(grid: &Grid) -> bool {
    let n = grid.len();
    for r in 0..n {
        for c in 0..n {
            let value = grid[r][c];
            if value == 0 {
                return true;
            }
            if c + 1 < n && can_merge(value, grid[r][c + 1]) {
                return true;
            }
            if r + 1 < n && can_merge(value, grid[r + 1][c]) {
                return true;
            }
        }
    }
    false
}

/// Immutable view for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesSnapshot {
    pub grid: Grid,
    pub score: u32,
    pub highest: u32,
    pub game_over: bool,
}

/// 2048 game state
#[derive(Debug, Clone)]
pub struct TileBoard {
    grid: Grid,
    score: u32,
    moves: u32,
    outcome: Option<Outcome>,
    rng: Pcg32,
}

impl TileBoard {
    /// Standard 4×4 board with two starting tiles
    pub fn new(seed: u64) -> Self {
        Self::with_size(GRID_SIZE, seed)
    }

    pub fn with_size(size: usize, seed: u64) -> Self {
        let mut board = Self {
            grid: vec![vec![0; size]; size],
            score: 0,
            moves: 0,
            outcome: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        for _ in 0..STARTING_TILES {
            board.spawn_tile();
        }
        board
    }

    /// Build a board from explicit rows (square, powers of two or 0)
    pub fn from_rows(rows: Grid, seed: u64) -> Option<Self> {
        let n = rows.len();
        if n == 0 || rows.iter().any(|row| row.len() != n) {
            return None;
        }
        if rows.iter().flatten().any(|&v| v != 0 && !v.is_power_of_two()) {
            return None;
        }
        let outcome = (!can_move(&rows)).then_some(Outcome::Lost);
        Some(Self {
            grid: rows,
            score: 0,
            moves: 0,
            outcome,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Moves that changed the board
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn highest_tile(&self) -> u32 {
        self.grid.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Apply a move: slide, and on change spawn a tile and re-check the end state.
    ///
    /// A move that changes nothing (or any move after game over) is a no-op.
    pub fn shift(&mut self, dir: Direction) -> SlideResult {
        if self.outcome.is_some() {
            return SlideResult {
                grid: self.grid.clone(),
                points: 0,
                moved: false,
            };
        }

        let result = slide(&self.grid, dir);
        if !result.moved {
            return result;
        }

        self.grid = result.grid.clone();
        self.score = self.score.saturating_add(result.points);
        self.moves += 1;
        self.spawn_tile();

        if !can_move(&self.grid) {
            log::info!("2048: no moves left, final score {}", self.score);
            self.outcome = Some(Outcome::Lost);
        }
        result
    }

    /// Place a 2 (90%) or 4 in a uniformly chosen empty cell
    fn spawn_tile(&mut self) -> Option<(usize, usize)> {
        let empty: Vec<(usize, usize)> = self
            .grid
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, v)| **v == 0)
                    .map(move |(c, _)| (r, c))
            })
            .collect();
        if empty.is_empty() {
            return None;
        }
        let (r, c) = empty[self.rng.random_range(0..empty.len())];
        self.grid[r][c] = if self.rng.random_bool(TWO_PROBABILITY) { 2 } else { 4 };
        Some((r, c))
    }

    pub fn snapshot(&self) -> TilesSnapshot {
        TilesSnapshot {
            grid: self.grid.clone(),
            score: self.score,
            highest: self.highest_tile(),
            game_over: self.outcome.is_some(),
        }
    }
}
