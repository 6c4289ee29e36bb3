//! Host loop
//!
//! A `Session` owns exactly one engine and decides when it steps. The
//! platform layer feeds it input events and the current time from whatever
//! callback it has (animation frame, timer); the session turns that into
//! engine steps according to the game's `Schedule`. Pausing stops the clock
//! without touching engine state, restarting throws the engine away.

use crate::catalog;
use crate::consts::MAX_CATCHUP_STEPS;
use crate::persistence::{KeyValueStore, StoreError};
use crate::scores::{self, ScoreRecord};
use crate::sim::{AnyEngine, GameKind, Input, Outcome, Schedule, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Fresh engine, waiting for the first input
    Ready,
    Running,
    Paused,
    /// Engine reached a terminal state
    Over,
}

#[derive(Debug, Clone)]
pub struct Session {
    engine: AnyEngine,
    phase: SessionPhase,
    started_at_ms: f64,
    ended_at_ms: f64,
    /// Time up to which the engine has been stepped
    clock_ms: f64,
    /// Score write done; holds the record when one was made
    saved_score: Option<Option<ScoreRecord>>,
    submitted: bool,
}

impl Session {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        Self {
            engine: AnyEngine::create(kind, seed),
            phase: SessionPhase::Ready,
            started_at_ms: 0.0,
            ended_at_ms: 0.0,
            clock_ms: 0.0,
            saved_score: None,
            submitted: false,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.engine.kind()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn engine(&self) -> &AnyEngine {
        &self.engine
    }

    pub fn score(&self) -> u32 {
        self.engine.score()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.engine.outcome()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    /// Whole seconds between the first input and the end (or `now_ms`)
    pub fn duration_secs(&self, now_ms: f64) -> u32 {
        let end = match self.phase {
            SessionPhase::Ready => return 0,
            SessionPhase::Over => self.ended_at_ms,
            _ => now_ms,
        };
        ((end - self.started_at_ms).max(0.0) / 1000.0).floor() as u32
    }

    /// Route one input to the engine. The first input starts the run.
    pub fn handle_input(&mut self, input: Input, now_ms: f64) -> bool {
        match self.phase {
            SessionPhase::Paused | SessionPhase::Over => return false,
            SessionPhase::Ready => {
                self.phase = SessionPhase::Running;
                self.started_at_ms = now_ms;
                self.clock_ms = now_ms;
                log::info!("{} started", self.kind().id());
            }
            SessionPhase::Running => {
                // Bring delay timers up to date so they count from this input
                if self.kind().schedule() == Schedule::OnInput {
                    self.advance(now_ms);
                    if self.phase != SessionPhase::Running {
                        return false;
                    }
                }
            }
        }
        let applied = self.engine.apply(input);
        self.check_over(now_ms);
        applied
    }

    /// Step the engine up to `now_ms`; returns the number of steps taken
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        if self.phase != SessionPhase::Running {
            return 0;
        }

        let steps = match self.kind().schedule() {
            Schedule::EveryFrame => {
                self.engine.step(0);
                self.clock_ms = now_ms;
                1
            }
            Schedule::Interval { period_ms } => {
                let period = period_ms as f64;
                let mut steps = 0;
                while now_ms - self.clock_ms >= period && steps < MAX_CATCHUP_STEPS {
                    self.engine.step(period_ms);
                    self.clock_ms += period;
                    steps += 1;
                    if self.engine.is_terminal() {
                        break;
                    }
                }
                // Drop backlog we refused to replay
                if now_ms - self.clock_ms >= period {
                    log::debug!("dropping {:.0} ms of timer backlog", now_ms - self.clock_ms);
                    self.clock_ms = now_ms;
                }
                steps
            }
            Schedule::OnInput => {
                let dt = (now_ms - self.clock_ms).max(0.0);
                self.clock_ms = now_ms;
                if dt >= 1.0 {
                    self.engine.step(dt as u32);
                    1
                } else {
                    0
                }
            }
        };

        self.check_over(now_ms);
        steps
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        self.phase = SessionPhase::Paused;
        log::info!("{} paused", self.kind().id());
        true
    }

    /// Resume without replaying the time spent paused
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.phase != SessionPhase::Paused {
            return false;
        }
        self.phase = SessionPhase::Running;
        self.clock_ms = now_ms;
        log::info!("{} resumed", self.kind().id());
        true
    }

    pub fn toggle_pause(&mut self, now_ms: f64) -> bool {
        match self.phase {
            SessionPhase::Running => self.pause(),
            SessionPhase::Paused => self.resume(now_ms),
            _ => false,
        }
    }

    /// Discard the engine and start over with a new seed
    pub fn restart(&mut self, seed: u64) {
        let kind = self.kind();
        *self = Self::new(kind, seed);
        log::info!("{} restarted (seed {})", kind.id(), seed);
    }

    fn check_over(&mut self, now_ms: f64) {
        if self.phase == SessionPhase::Running && self.engine.is_terminal() {
            self.phase = SessionPhase::Over;
            self.ended_at_ms = now_ms;
            log::info!(
                "{} over ({:?}), score {}",
                self.kind().id(),
                self.engine.outcome(),
                self.engine.score()
            );
        }
    }

    /// Record the finished run, once. Runs that scored nothing only count as a play.
    ///
    /// A failed write leaves the run unsubmitted so the caller can retry; a
    /// score that was already written is not written again.
    pub fn finish<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        now_ms: f64,
    ) -> Result<Option<ScoreRecord>, StoreError> {
        if self.phase != SessionPhase::Over || self.submitted {
            return Ok(None);
        }

        let id = self.kind().id();
        let record = match self.saved_score.clone() {
            Some(record) => record,
            None => {
                let score = self.engine.score();
                let record = if score == 0 {
                    None
                } else {
                    let duration = self.duration_secs(now_ms);
                    Some(scores::record_score(store, id, score, duration, now_ms)?)
                };
                self.saved_score = Some(record.clone());
                record
            }
        };

        catalog::record_play(store, id)?;
        self.submitted = true;
        Ok(record)
    }
}
