//! Memory Match
//!
//! Event-driven: `reveal` flips cards, and once two are face up the game
//! locks input and counts down a short delay (`step`) before either locking
//! the pair in or turning both back over.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Outcome;
use crate::consts::memory::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: usize,
    /// Index into the symbol table
    pub symbol: u8,
    pub flipped: bool,
    /// Set once, never cleared
    pub matched: bool,
}

impl Card {
    pub fn face_up(&self) -> bool {
        self.flipped || self.matched
    }
}

/// Selection state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairPhase {
    /// Zero or one card face up, waiting for input
    Idle { first: Option<usize> },
    /// Two cards face up; input is locked until the delay runs out
    Evaluating {
        first: usize,
        second: usize,
        matched: bool,
        remaining_ms: u32,
    },
    /// Every card matched
    Complete,
}

/// Immutable view for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub cards: Vec<Card>,
    pub moves: u32,
    pub score: u32,
    /// Input currently locked
    pub locked: bool,
    pub complete: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    cards: Vec<Card>,
    phase: PairPhase,
    moves: u32,
}

impl MemoryGame {
    /// Standard deck: two of each symbol
    pub fn new(seed: u64) -> Self {
        Self::with_pairs(SYMBOLS.len(), seed)
    }

    /// Deck with `pairs` symbol pairs, shuffled with `seed`
    pub fn with_pairs(pairs: usize, seed: u64) -> Self {
        let pairs = pairs.clamp(1, u8::MAX as usize + 1);
        let mut symbols: Vec<u8> = (0..pairs).flat_map(|s| [s as u8, s as u8]).collect();
        let mut rng = Pcg32::seed_from_u64(seed);
        symbols.shuffle(&mut rng);

        let cards = symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Card {
                id,
                symbol,
                flipped: false,
                matched: false,
            })
            .collect();

        Self {
            cards,
            phase: PairPhase::Idle { first: None },
            moves: 0,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn phase(&self) -> PairPhase {
        self.phase
    }

    /// Pairs evaluated so far
    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Starts at the base score and loses a fixed amount per move, floored at zero
    pub fn score(&self) -> u32 {
        BASE_SCORE.saturating_sub(self.moves.saturating_mul(MOVE_PENALTY))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        (self.phase == PairPhase::Complete).then_some(Outcome::Won)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.phase, PairPhase::Evaluating { .. })
    }

    /// Turn a card face up.
    ///
    /// Returns false (and changes nothing) while a pair is being evaluated,
    /// after the game is complete, or for an unknown, flipped or matched card.
    pub fn reveal(&mut self, card_id: usize) -> bool {
        let PairPhase::Idle { first } = self.phase else {
            return false;
        };
        let Some(card) = self.cards.get_mut(card_id) else {
            return false;
        };
        if card.flipped || card.matched {
            return false;
        }
        card.flipped = true;

        match first {
            None => self.phase = PairPhase::Idle { first: Some(card_id) },
            Some(first) => {
                let matched = self.cards[first].symbol == self.cards[card_id].symbol;
                self.moves += 1;
                self.phase = PairPhase::Evaluating {
                    first,
                    second: card_id,
                    matched,
                    remaining_ms: if matched { MATCH_DELAY_MS } else { MISMATCH_DELAY_MS },
                };
                log::debug!(
                    "memory: move {} pair ({first}, {card_id}) matched={matched}",
                    self.moves
                );
            }
        }
        true
    }

    /// Count down the evaluation delay by `dt_ms`, resolving the pair when it runs out
    pub fn step(&mut self, dt_ms: u32) {
        if let PairPhase::Evaluating {
            first,
            second,
            matched,
            remaining_ms,
        } = self.phase
        {
            let remaining_ms = remaining_ms.saturating_sub(dt_ms);
            if remaining_ms == 0 {
                self.resolve(first, second, matched);
            } else {
                self.phase = PairPhase::Evaluating {
                    first,
                    second,
                    matched,
                    remaining_ms,
                };
            }
        }
    }

    /// Skip the remaining delay
    pub fn resolve_now(&mut self) {
        if let PairPhase::Evaluating {
            first,
            second,
            matched,
            ..
        } = self.phase
        {
            self.resolve(first, second, matched);
        }
    }

    fn resolve(&mut self, first: usize, second: usize, matched: bool) {
        for id in [first, second] {
            let card = &mut self.cards[id];
            card.flipped = false;
            if matched {
                card.matched = true;
            }
        }

        // Checked only after the match flags are committed
        self.phase = if self.cards.iter().all(|c| c.matched) {
            log::info!("memory: all pairs found in {} moves", self.moves);
            PairPhase::Complete
        } else {
            PairPhase::Idle { first: None }
        };
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            cards: self.cards.clone(),
            moves: self.moves,
            score: self.score(),
            locked: self.is_locked(),
            complete: self.phase == PairPhase::Complete,
        }
    }
}

/// Display glyph for a symbol index
pub fn symbol_glyph(symbol: u8) -> &'static str {
    SYMBOLS.get(symbol as usize).copied().unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Ids of the two cards carrying `symbol`
    fn pair_of(game: &MemoryGame, symbol: u8) -> (usize, usize) {
        let ids: Vec<usize> = game
            .cards()
            .iter()
            .filter(|c| c.symbol == symbol)
            .map(|c| c.id)
            .collect();
        (ids[0], ids[1])
    }

    fn mismatch(game: &MemoryGame) -> (usize, usize) {
        let first = game.cards()[0];
        let other = game.cards().iter().find(|c| c.symbol != first.symbol).unwrap();
        (first.id, other.id)
    }

    #[test]
    fn test_deck_has_exact_pairs() {
        let game = MemoryGame::new(5);
        assert_eq!(game.cards().len(), SYMBOLS.len() * 2);
        for symbol in 0..SYMBOLS.len() as u8 {
            assert_eq!(game.cards().iter().filter(|c| c.symbol == symbol).count(), 2);
        }
        assert!(game.cards().iter().enumerate().all(|(i, c)| c.id == i));
    }

    #[test]
    fn test_match_resolves_after_delay() {
        let mut game = MemoryGame::new(11);
        let (a, b) = pair_of(&game, 0);
        assert!(game.reveal(a));
        assert!(game.reveal(b));
        assert!(game.is_locked());
        assert_eq!(game.moves(), 1);

        game.step(MATCH_DELAY_MS - 1);
        assert!(!game.cards()[a].matched);
        game.step(1);
        assert!(game.cards()[a].matched && game.cards()[b].matched);
        assert_eq!(game.phase(), PairPhase::Idle { first: None });
    }

    #[test]
    fn test_mismatch_flips_back() {
        let mut game = MemoryGame::new(11);
        let (a, b) = mismatch(&game);
        game.reveal(a);
        game.reveal(b);
        game.step(MATCH_DELAY_MS);
        assert!(game.is_locked());
        game.step(MISMATCH_DELAY_MS - MATCH_DELAY_MS);
        assert!(!game.cards()[a].flipped && !game.cards()[b].flipped);
        assert!(!game.cards()[a].matched);
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_input_locked_while_evaluating() {
        let mut game = MemoryGame::new(2);
        let (a, b) = mismatch(&game);
        game.reveal(a);
        game.reveal(b);
        let third = (0..game.cards().len()).find(|&i| i != a && i != b).unwrap();
        assert!(!game.reveal(third));
        assert!(!game.cards()[third].flipped);
    }

    #[test]
    fn test_reveal_rejects_bad_targets() {
        let mut game = MemoryGame::new(2);
        assert!(!game.reveal(999));
        assert!(game.reveal(0));
        assert!(!game.reveal(0));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_perfect_game() {
        let mut game = MemoryGame::new(77);
        for symbol in 0..SYMBOLS.len() as u8 {
            let (a, b) = pair_of(&game, symbol);
            game.reveal(a);
            game.reveal(b);
            game.resolve_now();
        }
        assert_eq!(game.outcome(), Some(Outcome::Won));
        assert_eq!(game.moves(), SYMBOLS.len() as u32);
        assert_eq!(game.score(), BASE_SCORE - SYMBOLS.len() as u32 * MOVE_PENALTY);
        assert!(!game.reveal(0));
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut game = MemoryGame::new(3);
        let (a, b) = mismatch(&game);
        for _ in 0..(BASE_SCORE / MOVE_PENALTY + 5) {
            game.reveal(a);
            game.reveal(b);
            game.resolve_now();
        }
        assert_eq!(game.score(), 0);
    }

    proptest! {
        #[test]
        fn prop_matched_is_monotonic(seed in any::<u64>(), picks in prop::collection::vec((0usize..20, 0u32..1200), 1..300)) {
            let mut game = MemoryGame::new(seed);
            let mut seen = vec![false; game.cards().len()];
            let mut successes = 0;
            for (pick, dt) in picks {
                game.reveal(pick);
                let before = game.cards().iter().filter(|c| c.matched).count();
                game.step(dt);
                let after = game.cards().iter().filter(|c| c.matched).count();
                if after > before {
                    successes += 1;
                }
                for (i, card) in game.cards().iter().enumerate() {
                    prop_assert!(!(seen[i] && !card.matched));
                    seen[i] = card.matched;
                }
                if game.outcome().is_some() {
                    break;
                }
            }
            prop_assert!(successes <= SYMBOLS.len());
            if game.outcome().is_some() {
                prop_assert_eq!(successes, SYMBOLS.len());
            }
        }
    }
}
