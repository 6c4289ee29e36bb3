//! Game Hub entry point
//!
//! Handles platform-specific initialization and runs the host loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, KeyboardEvent, MouseEvent};

    use game_hub::consts::breakout::FIELD_WIDTH;
    use game_hub::persistence::LocalStore;
    use game_hub::platform::{clock_seed, now_ms};
    use game_hub::scores;
    use game_hub::sim::{Direction, GameKind, Input};
    use game_hub::view::{card_for_key, render_text};
    use game_hub::{Session, SessionPhase};

    /// Page-level state: one session plus the store it reports to
    struct Hub {
        session: Session,
        store: Option<LocalStore>,
        best: u32,
        board: Option<HtmlElement>,
        /// Last save attempt failed; retried every frame, logged once
        save_failed: bool,
    }

    impl Hub {
        fn new(kind: GameKind) -> Self {
            let store = match LocalStore::open() {
                Ok(store) => Some(store),
                Err(e) => {
                    log::warn!("Scores will not be saved: {}", e);
                    None
                }
            };
            let best = store
                .as_ref()
                .map(|s| scores::get_high_score(s, kind.id()))
                .unwrap_or(0);
            let board = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("board"))
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            Self {
                session: Session::new(kind, clock_seed()),
                store,
                best,
                board,
                save_failed: false,
            }
        }

        fn handle_key(&mut self, key: &str) {
            let now = now_ms();
            match key {
                " " => {
                    self.session.toggle_pause(now);
                    return;
                }
                "r" | "R" | "Enter" => {
                    self.session.restart(clock_seed());
                    return;
                }
                _ => {}
            }

            let input = match self.session.kind() {
                GameKind::Memory => card_for_key(key).map(Input::Reveal),
                _ => Direction::from_key(key).map(Input::Move),
            };
            if let Some(input) = input {
                self.session.handle_input(input, now);
            }
        }

        fn handle_pointer(&mut self, x: f32, width: f32) {
            if self.session.kind() != GameKind::Breakout || width <= 0.0 {
                return;
            }
            self.session
                .handle_input(Input::PaddleTo(x / width * FIELD_WIDTH), now_ms());
        }

        fn update(&mut self) {
            let now = now_ms();
            self.session.advance(now);

            if self.session.phase() == SessionPhase::Over {
                if let Some(store) = self.store.as_mut() {
                    match self.session.finish(store, now) {
                        Ok(record) => {
                            self.save_failed = false;
                            if let Some(record) = record {
                                if record.is_high_score {
                                    log::info!(
                                        "🎉 New high score! You scored {} points!",
                                        record.score_value
                                    );
                                }
                                self.best = self.best.max(record.score_value);
                            }
                        }
                        Err(e) => {
                            if !self.save_failed {
                                log::error!("Failed to save score: {}", e);
                            }
                            self.save_failed = true;
                        }
                    }
                }
            }
        }

        fn render(&self) {
            let Some(board) = &self.board else {
                return;
            };
            let mut text = render_text(&self.session.snapshot());
            text.push_str(&format!("  best {}", self.best));
            match self.session.phase() {
                SessionPhase::Ready => text.push_str("\n\nPress a key to start"),
                SessionPhase::Paused => text.push_str("\n\nPaused (space to resume)"),
                SessionPhase::Over => text.push_str("\n\nGame over (R to play again)"),
                SessionPhase::Running => {}
            }
            board.set_text_content(Some(&text));
        }
    }

    /// Game chosen by the location hash, e.g. `#snake`
    fn selected_kind() -> GameKind {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .and_then(|hash| GameKind::from_id(hash.trim_start_matches('#')))
            .unwrap_or(GameKind::Snake)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let kind = selected_kind();
        log::info!("Game Hub starting {}...", kind.title());

        let hub = Rc::new(RefCell::new(Hub::new(kind)));
        setup_input_handlers(hub.clone());
        setup_auto_pause(hub.clone());
        request_animation_frame(hub);
    }

    fn setup_input_handlers(hub: Rc<RefCell<Hub>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard
        {
            let hub = hub.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if Direction::from_key(&key).is_some() || key == " " {
                    event.prevent_default();
                }
                hub.borrow_mut().handle_key(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer over the board drives the paddle
        let board = hub.borrow().board.clone();
        if let Some(board) = board {
            let board_clone = board.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = board_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                hub.borrow_mut().handle_pointer(x, rect.width() as f32);
            });
            let _ = board
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(hub: Rc<RefCell<Hub>>) {
        let window = web_sys::window().expect("no window");
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let hub = hub.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && hub.borrow_mut().session.pause()
                {
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if hub.borrow_mut().session.pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(hub: Rc<RefCell<Hub>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(hub);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(hub: Rc<RefCell<Hub>>) {
        {
            let mut h = hub.borrow_mut();
            h.update();
            h.render();
        }

        request_animation_frame(hub);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Game Hub (native) starting...");
    log::info!("Native mode runs a headless autoplay demo - serve the wasm build to play");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autoplay of every game against an in-memory store
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::HashMap;

    use game_hub::platform::clock_seed;
    use game_hub::sim::{Direction, GameKind, Input, SnakeSnapshot, Snapshot};
    use game_hub::view::render_text;
    use game_hub::{MemoryStore, Session, SessionPhase, scores};

    /// Simulated frame length
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this much simulated time
    const TIME_LIMIT_MS: f64 = 10.0 * 60.0 * 1000.0;

    pub fn run() {
        let mut store = MemoryStore::new();
        let seed = clock_seed();

        for kind in GameKind::ALL {
            let mut session = Session::new(kind, seed);
            let mut player = Player::default();
            let mut now = 0.0;

            while session.phase() != SessionPhase::Over && now < TIME_LIMIT_MS {
                if let Some(input) = player.choose(&session.snapshot()) {
                    session.handle_input(input, now);
                }
                session.advance(now);
                now += FRAME_MS;
            }

            println!("\n== {} ==\n{}", kind.title(), render_text(&session.snapshot()));
            match session.finish(&mut store, now) {
                Ok(Some(record)) => println!(
                    "recorded {} in {}s{}",
                    record.score_value,
                    record.game_duration,
                    if record.is_high_score { " (new high score)" } else { "" }
                ),
                Ok(None) => println!("nothing recorded ({:?})", session.phase()),
                Err(e) => log::error!("failed to record score: {}", e),
            }
        }

        for kind in GameKind::ALL {
            println!("best {:>8}: {}", kind.id(), scores::get_high_score(&store, kind.id()));
        }
    }

    /// Simple scripted player per game
    #[derive(Default)]
    struct Player {
        turn: usize,
        /// Memory: symbol -> card ids seen face up
        seen: HashMap<u8, Vec<usize>>,
        next_unseen: usize,
    }

    impl Player {
        fn choose(&mut self, snapshot: &Snapshot) -> Option<Input> {
            self.turn += 1;
            match snapshot {
                Snapshot::Tiles(_) => {
                    const CYCLE: [Direction; 4] =
                        [Direction::Left, Direction::Down, Direction::Right, Direction::Down];
                    Some(Input::Move(CYCLE[self.turn % CYCLE.len()]))
                }
                Snapshot::Breakout(s) => Some(Input::PaddleTo(s.ball.pos.x)),
                Snapshot::Snake(s) => chase_food(s).map(Input::Move),
                Snapshot::Memory(s) => {
                    for card in s.cards.iter().filter(|c| c.flipped) {
                        let ids = self.seen.entry(card.symbol).or_default();
                        if !ids.contains(&card.id) {
                            ids.push(card.id);
                        }
                    }
                    if s.locked {
                        return None;
                    }
                    let face_up: Vec<usize> =
                        s.cards.iter().filter(|c| c.flipped).map(|c| c.id).collect();

                    // Complete a known pair first
                    let known = self.seen.values().find(|ids| {
                        ids.len() == 2 && ids.iter().all(|&id| !s.cards[id].matched)
                    });
                    if let Some(ids) = known {
                        return ids
                            .iter()
                            .copied()
                            .find(|id| !face_up.contains(id))
                            .map(Input::Reveal);
                    }

                    while self.next_unseen < s.cards.len() {
                        let id = self.next_unseen;
                        self.next_unseen += 1;
                        if !s.cards[id].matched && !s.cards[id].flipped {
                            return Some(Input::Reveal(id));
                        }
                    }
                    None
                }
            }
        }
    }

    /// Turn toward the food along the shorter wrapped axis
    fn chase_food(s: &SnakeSnapshot) -> Option<Direction> {
        let head = *s.body.first()?;
        let food = s.food?;
        let dx = (food.x - head.x).rem_euclid(s.size);
        let dy = (food.y - head.y).rem_euclid(s.size);
        if dx != 0 {
            Some(if dx <= s.size / 2 { Direction::Right } else { Direction::Left })
        } else if dy != 0 {
            Some(if dy <= s.size / 2 { Direction::Down } else { Direction::Up })
        } else {
            None
        }
    }
}
