//! Breakout physics
//!
//! Fixed per-frame displacement, axis-aligned bounces only: every collision
//! flips the sign of one velocity component, so ball speed never changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Outcome;
use crate::consts::breakout::*;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Strict interior test (edges don't count)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.pos.x
            && p.x < self.pos.x + self.size.x
            && p.y > self.pos.y
            && p.y < self.pos.y + self.size.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// Player paddle; `x` is the left edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub width: f32,
}

impl Paddle {
    fn spans(&self, x: f32) -> bool {
        x > self.x && x < self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    /// Cleared by a hit, never set again
    pub alive: bool,
}

/// Immutable view for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutSnapshot {
    pub field: Vec2,
    pub ball: Ball,
    pub paddle: Rect,
    pub bricks: Vec<Rect>,
    pub score: u32,
    pub outcome: Option<Outcome>,
}

/// Breakout game state
#[derive(Debug, Clone)]
pub struct Breakout {
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: Vec<Brick>,
    score: u32,
    frames: u64,
    outcome: Option<Outcome>,
}

impl Default for Breakout {
    fn default() -> Self {
        Self::new()
    }
}

impl Breakout {
    pub fn new() -> Self {
        Self {
            ball: Ball {
                pos: Vec2::new(BALL_START.0, BALL_START.1),
                vel: Vec2::new(BALL_VELOCITY.0, BALL_VELOCITY.1),
                radius: BALL_RADIUS,
            },
            paddle: Paddle {
                x: (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
                width: PADDLE_WIDTH,
            },
            bricks: build_wall(),
            score: 0,
            frames: 0,
            outcome: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    /// y coordinate past which the ball is level with the paddle
    pub fn paddle_line() -> f32 {
        FIELD_HEIGHT - BALL_RADIUS - PADDLE_HEIGHT - PADDLE_MARGIN
    }

    /// Centre the paddle on `x`, clamped to the field
    pub fn set_paddle_center(&mut self, x: f32) {
        if self.outcome.is_some() || !x.is_finite() {
            return;
        }
        self.paddle.x = (x - self.paddle.width / 2.0).clamp(0.0, FIELD_WIDTH - self.paddle.width);
    }

    pub fn nudge_paddle(&mut self, dx: f32) {
        let center = self.paddle.x + self.paddle.width / 2.0;
        self.set_paddle_center(center + dx);
    }

    /// Advance one frame
    pub fn step(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        self.frames += 1;

        // One brick per frame, first found wins
        if let Some(brick) = self
            .bricks
            .iter_mut()
            .find(|b| b.alive && b.rect.contains(self.ball.pos))
        {
            brick.alive = false;
            self.ball.vel.y = -self.ball.vel.y;
            self.score += BRICK_POINTS;
            log::debug!("breakout: brick hit at frame {}", self.frames);
        }

        if self.bricks.iter().all(|b| !b.alive) {
            log::info!("breakout: wall cleared, score {}", self.score);
            self.outcome = Some(Outcome::Won);
            return;
        }

        self.ball.pos += self.ball.vel;

        let next = self.ball.pos + self.ball.vel;
        let r = self.ball.radius;
        if next.x > FIELD_WIDTH - r || next.x < r {
            self.ball.vel.x = -self.ball.vel.x;
        }
        if next.y < r {
            self.ball.vel.y = -self.ball.vel.y;
        } else if next.y > Self::paddle_line() {
            if self.paddle.spans(self.ball.pos.x) {
                self.ball.vel.y = -self.ball.vel.y;
            } else if next.y > FIELD_HEIGHT - r {
                log::info!("breakout: ball lost, score {}", self.score);
                self.outcome = Some(Outcome::Lost);
            }
        }
    }

    pub fn snapshot(&self) -> BreakoutSnapshot {
        BreakoutSnapshot {
            field: Vec2::new(FIELD_WIDTH, FIELD_HEIGHT),
            ball: self.ball,
            paddle: Rect::new(
                self.paddle.x,
                FIELD_HEIGHT - PADDLE_HEIGHT - PADDLE_MARGIN,
                self.paddle.width,
                PADDLE_HEIGHT,
            ),
            bricks: self.bricks.iter().filter(|b| b.alive).map(|b| b.rect).collect(),
            score: self.score,
            outcome: self.outcome,
        }
    }
}

/// Lay out the brick wall row by row
fn build_wall() -> Vec<Brick> {
    let mut bricks = Vec::with_capacity(BRICK_ROWS * BRICK_COLS);
    for row in 0..BRICK_ROWS {
        for col in 0..BRICK_COLS {
            bricks.push(Brick {
                rect: Rect::new(
                    col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
                    row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
                    BRICK_WIDTH,
                    BRICK_HEIGHT,
                ),
                alive: true,
            });
        }
    }
    bricks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_layout() {
        let game = Breakout::new();
        assert_eq!(game.bricks_left(), BRICK_ROWS * BRICK_COLS);
        let last = game.bricks.last().unwrap().rect;
        assert!(last.pos.y + last.size.y < Breakout::paddle_line());
        assert_eq!(game.ball.pos, Vec2::new(300.0, 450.0));
    }

    #[test]
    fn test_brick_hit_flips_vertical() {
        let mut game = Breakout::new();
        let target = game.bricks[0].rect;
        game.ball.pos = target.pos + target.size / 2.0;
        game.ball.vel = Vec2::new(3.0, -3.0);
        game.step();
        assert!(!game.bricks[0].alive);
        assert_eq!(game.score(), BRICK_POINTS);
        assert!(game.ball.vel.y > 0.0);
    }

    #[test]
    fn test_one_brick_per_frame() {
        let mut game = Breakout::new();
        // Stack a duplicate brick on top of the first
        let dup = game.bricks[0];
        game.bricks.insert(1, dup);
        game.ball.pos = dup.rect.pos + dup.rect.size / 2.0;
        game.step();
        assert!(!game.bricks[0].alive);
        assert!(game.bricks[1].alive);
        assert_eq!(game.score(), BRICK_POINTS);
    }

    #[test]
    fn test_side_wall_bounce() {
        let mut game = Breakout::new();
        game.ball.pos = Vec2::new(FIELD_WIDTH - 12.0, 300.0);
        game.ball.vel = Vec2::new(3.0, 3.0);
        game.step();
        assert!(game.ball.vel.x < 0.0);
    }

    #[test]
    fn test_ceiling_bounce() {
        let mut game = Breakout::new();
        game.ball.pos = Vec2::new(5.0 + BALL_RADIUS, 12.0);
        game.ball.vel = Vec2::new(3.0, -3.0);
        game.step();
        assert!(game.ball.vel.y > 0.0);
    }

    #[test]
    fn test_paddle_bounce() {
        let mut game = Breakout::new();
        game.set_paddle_center(300.0);
        game.ball.pos = Vec2::new(300.0, Breakout::paddle_line() - 4.0);
        game.ball.vel = Vec2::new(3.0, 3.0);
        game.step();
        assert!(game.ball.vel.y < 0.0);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn test_miss_loses() {
        let mut game = Breakout::new();
        game.set_paddle_center(50.0);
        game.ball.pos = Vec2::new(400.0, Breakout::paddle_line());
        game.ball.vel = Vec2::new(3.0, 3.0);
        for _ in 0..20 {
            game.step();
        }
        assert_eq!(game.outcome(), Some(Outcome::Lost));
    }

    #[test]
    fn test_last_brick_wins() {
        let mut game = Breakout::new();
        for brick in game.bricks.iter_mut().skip(1) {
            brick.alive = false;
        }
        let target = game.bricks[0].rect;
        game.ball.pos = target.pos + target.size / 2.0;
        let before = game.ball.pos;
        game.step();
        assert_eq!(game.outcome(), Some(Outcome::Won));
        assert_eq!(game.ball.pos, before);
        assert_eq!(game.bricks_left(), 0);
    }

    #[test]
    fn test_paddle_clamped() {
        let mut game = Breakout::new();
        game.set_paddle_center(-500.0);
        assert_eq!(game.paddle.x, 0.0);
        game.set_paddle_center(5000.0);
        assert_eq!(game.paddle.x, FIELD_WIDTH - PADDLE_WIDTH);
        game.nudge_paddle(-PADDLE_KEY_STEP);
        assert_eq!(game.paddle.x, FIELD_WIDTH - PADDLE_WIDTH - PADDLE_KEY_STEP);
    }

    #[test]
    fn test_stepping_after_end_is_noop() {
        let mut game = Breakout::new();
        game.outcome = Some(Outcome::Lost);
        let ball = game.ball;
        game.step();
        assert_eq!(game.ball, ball);
    }

    proptest! {
        #[test]
        fn prop_speed_invariant(paddle_x in 0.0f32..600.0, frames in 1usize..600) {
            let mut game = Breakout::new();
            let speed = game.ball.speed();
            for _ in 0..frames {
                game.set_paddle_center(paddle_x);
                game.step();
                prop_assert_eq!(game.ball.speed(), speed);
                prop_assert!(game.paddle.x >= 0.0 && game.paddle.x <= FIELD_WIDTH - PADDLE_WIDTH);
            }
        }
    }
}
