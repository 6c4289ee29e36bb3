//! Text projection of engine snapshots
//!
//! Used by the native demo and the browser's `<pre>` board. Reads snapshots
//! only; never touches an engine.

use std::fmt::Write;

use crate::sim::pairs::symbol_glyph;
use crate::sim::{BreakoutSnapshot, Coord, MemorySnapshot, SnakeSnapshot, Snapshot, TilesSnapshot};

/// Breakout raster size in characters
const BREAKOUT_COLS: usize = 60;
const BREAKOUT_ROWS: usize = 25;

/// Memory board width in cards
const MEMORY_COLUMNS: usize = 4;

pub fn render_text(snapshot: &Snapshot) -> String {
    match snapshot {
        Snapshot::Tiles(s) => render_tiles(s),
        Snapshot::Breakout(s) => render_breakout(s),
        Snapshot::Snake(s) => render_snake(s),
        Snapshot::Memory(s) => render_memory(s),
    }
}

pub fn render_tiles(s: &TilesSnapshot) -> String {
    let width = s.highest.max(2).to_string().len().max(4);
    let mut out = String::new();
    for row in &s.grid {
        let cells: Vec<String> = row
            .iter()
            .map(|&v| {
                if v == 0 {
                    format!("{:>width$}", ".")
                } else {
                    format!("{:>width$}", v)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" "));
    }
    let _ = write!(out, "score {}", s.score);
    out
}

pub fn render_snake(s: &SnakeSnapshot) -> String {
    let size = s.size.max(0) as usize;
    let mut board = vec![vec!['.'; size]; size];
    let mut put = |c: Coord, ch: char| {
        if c.in_bounds(s.size) {
            board[c.y as usize][c.x as usize] = ch;
        }
    };
    if let Some(food) = s.food {
        put(food, '*');
    }
    for (i, &segment) in s.body.iter().enumerate() {
        put(segment, if i == 0 { '@' } else { 'o' });
    }

    let mut out = String::new();
    for row in board {
        let _ = writeln!(out, "{}", row.into_iter().collect::<String>());
    }
    let _ = write!(out, "score {}", s.score);
    out
}

pub fn render_breakout(s: &BreakoutSnapshot) -> String {
    let sx = BREAKOUT_COLS as f32 / s.field.x;
    let sy = BREAKOUT_ROWS as f32 / s.field.y;
    let mut board = vec![vec![' '; BREAKOUT_COLS]; BREAKOUT_ROWS];

    let mut fill = |x0: f32, y0: f32, x1: f32, y1: f32, ch: char| {
        let c0 = ((x0 * sx).floor().max(0.0) as usize).min(BREAKOUT_COLS - 1);
        let c1 = ((x1 * sx).ceil() as usize).clamp(c0 + 1, BREAKOUT_COLS);
        let r0 = ((y0 * sy).floor().max(0.0) as usize).min(BREAKOUT_ROWS - 1);
        let r1 = ((y1 * sy).ceil() as usize).clamp(r0 + 1, BREAKOUT_ROWS);
        for row in board.iter_mut().take(r1).skip(r0) {
            for cell in row.iter_mut().take(c1).skip(c0) {
                *cell = ch;
            }
        }
    };

    for brick in &s.bricks {
        fill(
            brick.pos.x,
            brick.pos.y,
            brick.pos.x + brick.size.x - 1.0,
            brick.pos.y + brick.size.y - 1.0,
            '#',
        );
    }
    fill(
        s.paddle.pos.x,
        s.paddle.pos.y,
        s.paddle.pos.x + s.paddle.size.x,
        s.paddle.pos.y + 1.0,
        '=',
    );
    fill(s.ball.pos.x, s.ball.pos.y, s.ball.pos.x, s.ball.pos.y, 'O');

    let mut out = String::new();
    for row in board {
        let _ = writeln!(out, "|{}|", row.into_iter().collect::<String>());
    }
    let _ = write!(out, "score {}", s.score);
    out
}

pub fn render_memory(s: &MemorySnapshot) -> String {
    let mut out = String::new();
    for row in s.cards.chunks(MEMORY_COLUMNS) {
        let cells: Vec<String> = row
            .iter()
            .map(|card| {
                let key = card_key(card.id).unwrap_or(' ');
                let face = if card.matched {
                    format!("[{}]", symbol_glyph(card.symbol))
                } else if card.flipped {
                    format!(" {} ", symbol_glyph(card.symbol))
                } else {
                    " ? ".to_string()
                };
                format!("{}:{}", key, face)
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  "));
    }
    let _ = write!(out, "moves {}  score {}", s.moves, s.score);
    out
}

/// Keyboard letter for a card id (a, b, c, ...)
pub fn card_key(id: usize) -> Option<char> {
    u8::try_from(id)
        .ok()
        .filter(|&i| i < 26)
        .map(|i| (b'a' + i) as char)
}

/// Card id for a keyboard letter
pub fn card_for_key(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let ch = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() || !ch.is_ascii_lowercase() {
        return None;
    }
    Some((ch as u8 - b'a') as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AnyEngine, Direction, GameKind, SnakeGame, TileBoard};

    #[test]
    fn test_tiles_text() {
        let board = TileBoard::from_rows(vec![vec![2, 0], vec![0, 4]], 0).unwrap();
        let text = render_tiles(&board.snapshot());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "   2    .");
        assert_eq!(lines[1], "   .    4");
        assert_eq!(lines[2], "score 0");
    }

    #[test]
    fn test_snake_text() {
        let game = SnakeGame::from_parts(
            vec![Coord::new(1, 0), Coord::new(0, 0)],
            Direction::Right,
            Coord::new(2, 2),
            3,
            0,
        )
        .unwrap();
        let text = render_snake(&game.snapshot());
        assert!(text.starts_with("o@.\n...\n..*\n"));
    }

    #[test]
    fn test_every_kind_renders() {
        for kind in GameKind::ALL {
            let text = render_text(&AnyEngine::create(kind, 5).snapshot());
            assert!(text.contains("score"));
        }
    }

    #[test]
    fn test_breakout_draws_everything() {
        let text = render_text(&AnyEngine::create(GameKind::Breakout, 0).snapshot());
        assert!(text.contains('#'));
        assert!(text.contains('='));
        assert!(text.contains('O'));
    }

    #[test]
    fn test_card_keys() {
        assert_eq!(card_key(0), Some('a'));
        assert_eq!(card_key(15), Some('p'));
        assert_eq!(card_key(26), None);
        assert_eq!(card_for_key("P"), Some(15));
        assert_eq!(card_for_key("Enter"), None);
        assert_eq!(card_for_key("1"), None);
    }
}
