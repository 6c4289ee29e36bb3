//! Snake on a wrapping grid
//!
//! Steering only buffers a pending direction; it is committed on the next
//! tick. The board has no walls, so the only way to lose is to run into
//! yourself.

use std::collections::{HashSet, VecDeque};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Coord, Direction, Outcome};
use crate::consts::snake::*;

/// Immutable view for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    pub size: i32,
    /// Head first
    pub body: Vec<Coord>,
    pub food: Option<Coord>,
    pub direction: Direction,
    pub score: u32,
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    size: i32,
    /// Head at the front
    body: VecDeque<Coord>,
    direction: Direction,
    pending: Direction,
    food: Option<Coord>,
    score: u32,
    ticks: u64,
    outcome: Option<Outcome>,
    rng: Pcg32,
}

impl SnakeGame {
    pub fn new(seed: u64) -> Self {
        Self::spawn(GRID_SIZE, Coord::new(START.0, START.1), seed)
    }

    /// Fresh game on a `size`×`size` board, head in the middle
    pub fn with_size(size: i32, seed: u64) -> Self {
        Self::spawn(size.max(2), Coord::new(size / 2, size / 2), seed)
    }

    fn spawn(size: i32, head: Coord, seed: u64) -> Self {
        let mut game = Self {
            size,
            body: VecDeque::from([head]),
            direction: Direction::Right,
            pending: Direction::Right,
            food: None,
            score: 0,
            ticks: 0,
            outcome: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        game.food = game.place_food();
        game
    }

    /// Build a game from an explicit body (head first) and food cell.
    ///
    /// Returns None for an empty body, cells off the board, overlapping
    /// segments, or food on the body.
    pub fn from_parts(
        body: Vec<Coord>,
        direction: Direction,
        food: Coord,
        size: i32,
        seed: u64,
    ) -> Option<Self> {
        if body.is_empty() || !food.in_bounds(size) || body.iter().any(|c| !c.in_bounds(size)) {
            return None;
        }
        let cells: HashSet<Coord> = body.iter().copied().collect();
        if cells.len() != body.len() || cells.contains(&food) {
            return None;
        }
        Some(Self {
            size,
            body: body.into(),
            direction,
            pending: direction,
            food: Some(food),
            score: 0,
            ticks: 0,
            outcome: None,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    pub fn body(&self) -> impl Iterator<Item = &Coord> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn food(&self) -> Option<Coord> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Buffer a turn for the next tick.
    ///
    /// Only turns across the committed axis of travel are accepted, so the
    /// snake can never reverse into itself. Later calls before the tick
    /// overwrite earlier ones.
    pub fn steer(&mut self, dir: Direction) -> bool {
        if self.outcome.is_some() || dir.is_horizontal() == self.direction.is_horizontal() {
            return false;
        }
        self.pending = dir;
        true
    }

    /// Advance one tick
    pub fn step(&mut self) {
        if self.outcome.is_some() {
            return;
        }

        let dir = self.pending;
        let head = self.head().wrapped(dir, self.size);
        if self.body.contains(&head) {
            log::info!("snake: bit itself at {:?}, score {}", head, self.score);
            self.outcome = Some(Outcome::Lost);
            return;
        }

        self.ticks += 1;
        self.direction = dir;
        self.body.push_front(head);

        if self.food == Some(head) {
            self.score += FOOD_POINTS;
            self.food = self.place_food();
            if self.food.is_none() {
                log::info!("snake: board filled, score {}", self.score);
                self.outcome = Some(Outcome::Won);
            }
        } else {
            self.body.pop_back();
        }
    }

    /// Uniformly random free cell, None when the body fills the board
    fn place_food(&mut self) -> Option<Coord> {
        let occupied: HashSet<Coord> = self.body.iter().copied().collect();
        let free: Vec<Coord> = (0..self.size)
            .flat_map(|y| (0..self.size).map(move |x| Coord::new(x, y)))
            .filter(|c| !occupied.contains(c))
            .collect();
        if free.is_empty() {
            return None;
        }
        Some(free[self.rng.random_range(0..free.len())])
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            size: self.size,
            body: self.body.iter().copied().collect(),
            food: self.food,
            direction: self.direction,
            score: self.score,
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_game() {
        let game = SnakeGame::new(1);
        assert_eq!(game.head(), Coord::new(10, 10));
        assert_eq!(game.len(), 1);
        let food = game.food().unwrap();
        assert_ne!(food, game.head());
        assert!(food.in_bounds(GRID_SIZE));
    }

    #[test]
    fn test_wraps_around_edge() {
        let mut game = SnakeGame::from_parts(
            vec![Coord::new(19, 10)],
            Direction::Right,
            Coord::new(5, 5),
            20,
            0,
        )
        .unwrap();
        game.step();
        assert_eq!(game.head(), Coord::new(0, 10));
        assert_eq!(game.len(), 1);
    }

    #[test]
    fn test_reverse_rejected() {
        let mut game = SnakeGame::new(3);
        assert!(!game.steer(Direction::Left));
        assert_eq!(game.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_turn_buffered_until_tick() {
        let mut game = SnakeGame::new(3);
        assert!(game.steer(Direction::Up));
        assert!(game.steer(Direction::Down));
        assert_eq!(game.direction(), Direction::Right);
        game.step();
        assert_eq!(game.direction(), Direction::Down);
        assert_eq!(game.head(), Coord::new(10, 11));
    }

    #[test]
    fn test_double_turn_cannot_reverse() {
        let mut game = SnakeGame::new(3);
        // Up is buffered, but Left is still checked against the committed Right
        assert!(game.steer(Direction::Up));
        assert!(!game.steer(Direction::Left));
        assert_eq!(game.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = SnakeGame::from_parts(
            vec![Coord::new(4, 4), Coord::new(3, 4)],
            Direction::Right,
            Coord::new(5, 4),
            20,
            9,
        )
        .unwrap();
        game.step();
        assert_eq!(game.len(), 3);
        assert_eq!(game.score(), FOOD_POINTS);
        let food = game.food().unwrap();
        assert!(game.body().all(|c| *c != food));
    }

    #[test]
    fn test_self_collision_leaves_state() {
        // A 2x2 loop: head at (1,0) moving down into (1,1), which is body
        let body = vec![
            Coord::new(1, 0),
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(1, 1),
            Coord::new(2, 1),
        ];
        let mut game =
            SnakeGame::from_parts(body.clone(), Direction::Right, Coord::new(9, 9), 10, 0)
                .unwrap();
        assert!(game.steer(Direction::Down));
        game.step();
        assert_eq!(game.outcome(), Some(Outcome::Lost));
        assert_eq!(game.body().copied().collect::<Vec<_>>(), body);
        assert!(!game.steer(Direction::Up));
    }

    #[test]
    fn test_full_board_wins() {
        let body = vec![Coord::new(1, 0), Coord::new(1, 1), Coord::new(0, 1)];
        let mut game = SnakeGame::from_parts(body, Direction::Up, Coord::new(0, 0), 2, 0).unwrap();
        game.steer(Direction::Left);
        game.step();
        assert_eq!(game.len(), 4);
        assert_eq!(game.food(), None);
        assert_eq!(game.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_from_parts_rejects_bad_layouts() {
        let food = Coord::new(3, 3);
        assert!(SnakeGame::from_parts(vec![], Direction::Right, food, 5, 0).is_none());
        let overlap = vec![Coord::new(1, 1), Coord::new(1, 1)];
        assert!(SnakeGame::from_parts(overlap, Direction::Right, food, 5, 0).is_none());
        let off_board = vec![Coord::new(5, 0)];
        assert!(SnakeGame::from_parts(off_board, Direction::Right, food, 5, 0).is_none());
        let on_food = vec![food];
        assert!(SnakeGame::from_parts(on_food, Direction::Right, food, 5, 0).is_none());
        let clear = vec![Coord::new(0, 0)];
        assert!(SnakeGame::from_parts(clear, Direction::Right, food, 5, 0).is_some());
    }

    fn arb_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_head_in_bounds_and_no_overlap(seed in any::<u64>(), turns in prop::collection::vec(arb_direction(), 1..200)) {
            let mut game = SnakeGame::new(seed);
            let mut len = game.len();
            for dir in turns {
                game.steer(dir);
                game.step();
                prop_assert!(game.head().in_bounds(GRID_SIZE));
                let unique: HashSet<Coord> = game.body().copied().collect();
                prop_assert_eq!(unique.len(), game.len());
                prop_assert!(game.len() >= len);
                len = game.len();
                if let Some(food) = game.food() {
                    prop_assert!(!unique.contains(&food));
                }
                if game.outcome().is_some() {
                    break;
                }
            }
        }
    }
}
