//! Game session - the orchestrating state machine
//!
//! Owns the aggregate game state and routes every player action and gravity
//! tick through the collision resolver, line-clear engine, and scoring
//! functions. Single-threaded and cooperative: the hosting environment
//! serializes `dispatch` calls and tick callbacks onto one logical mutator.
//!
//! Timers live outside the engine. The host asks for `drop_interval_ms` and
//! a [`TickToken`], schedules its own callback, and calls `tick(token)` when
//! it fires; pause/restart/destroy/level-up invalidate outstanding tokens so
//! a stale timer can never mutate a replaced or disposed session.

use anyhow::Result;

use crate::board::Board;
use crate::clear::{LineClearEngine, TSpinHook};
use crate::collision::CollisionResolver;
use crate::config::GameConfig;
use crate::pieces::Piece;
use crate::rng::SevenBag;
use crate::scoring::{
    apply_line_score, combo_bonus, hard_drop_score, perfect_clear_bonus, soft_drop_score,
    t_spin_bonus,
};
use crate::snapshot::{GameSnapshot, GameSummary, PieceSnapshot};
use crate::types::{Cell, GameAction, PieceKind};

/// Handle identifying the currently scheduled tick. A token becomes stale
/// whenever the timer must be cancelled and rescheduled; `tick` with a stale
/// token is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken(u64);

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Aggregate game state. Owned exclusively by the session; replaced
/// wholesale on restart and frozen once the game is over.
#[derive(Debug, Clone)]
struct GameState {
    board: Board,
    current: Option<Piece>,
    next: PieceKind,
    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    phase: Phase,
    elapsed_ms: u64,
    pieces_dropped: u32,
}

impl GameState {
    fn new(config: &GameConfig, next: PieceKind) -> Self {
        Self {
            board: Board::new(config.board_width, config.board_height),
            current: None,
            next,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            phase: Phase::Idle,
            elapsed_ms: 0,
            pieces_dropped: 0,
        }
    }
}

type StateListener = Box<dyn Fn(&GameSnapshot)>;
type LinesListener = Box<dyn Fn(u32, &GameSnapshot)>;

#[derive(Default)]
struct Listeners {
    state_change: Vec<StateListener>,
    lines_cleared: Vec<LinesListener>,
    game_over: Vec<StateListener>,
}

/// A single game of falling blocks: state machine, tick routing, and
/// observer notifications.
pub struct GameSession {
    config: GameConfig,
    state: GameState,
    bag: SevenBag,
    collision: CollisionResolver,
    clears: LineClearEngine,
    listeners: Listeners,
    timer_generation: u64,
    last_action_was_rotation: bool,
    destroyed: bool,
}

impl GameSession {
    /// Create a session with a time-derived seed. Fails fast on an invalid
    /// configuration.
    pub fn new(config: GameConfig) -> Result<Self> {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(1);
        Self::with_seed(config, seed)
    }

    /// Create a session with an explicit randomizer seed. Same seed, same
    /// piece sequence - the deterministic-replay contract.
    pub fn with_seed(config: GameConfig, seed: u32) -> Result<Self> {
        config.validate()?;
        let mut bag = SevenBag::new(seed);
        let next = bag.peek();
        Ok(Self {
            state: GameState::new(&config, next),
            bag,
            collision: CollisionResolver::new(true),
            clears: LineClearEngine::new(),
            listeners: Listeners::default(),
            timer_generation: 0,
            last_action_was_rotation: false,
            destroyed: false,
            config,
        })
    }

    /// Disable wall-kick resolution for this session.
    pub fn without_kicks(mut self) -> Self {
        self.collision = CollisionResolver::new(false);
        self
    }

    /// Install a T-spin detector hook (baseline: none, always false).
    pub fn with_t_spin_hook(mut self, hook: TSpinHook) -> Self {
        self.clears = LineClearEngine::with_t_spin_hook(hook);
        self
    }

    // --- lifecycle -------------------------------------------------------

    /// Idle -> Playing: spawn the first piece and make the tick schedulable.
    pub fn start(&mut self) {
        if self.destroyed || self.state.phase != Phase::Idle {
            return;
        }
        self.state.phase = Phase::Playing;
        self.bump_timer();
        self.spawn_next();
    }

    /// Toggle Playing <-> Paused. The generation bump cancels the pending
    /// tick on pause and forces a reschedule on resume.
    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        match self.state.phase {
            Phase::Playing => {
                self.state.phase = Phase::Paused;
                self.bump_timer();
                self.notify_state();
            }
            Phase::Paused => {
                self.state.phase = Phase::Playing;
                self.bump_timer();
                self.notify_state();
            }
            _ => {}
        }
    }

    /// Replace the state wholesale and begin a fresh game. The randomizer
    /// continues its stream, so a restart does not replay the previous
    /// sequence. Allowed from any phase, including GameOver.
    pub fn restart(&mut self) {
        if self.destroyed {
            return;
        }
        self.bag = SevenBag::new(self.bag.seed());
        self.clears.reset();
        self.state = GameState::new(&self.config, self.bag.peek());
        self.last_action_was_rotation = false;
        self.bump_timer();
        self.state.phase = Phase::Playing;
        self.spawn_next();
    }

    /// Dispose of the session: invalidates any pending tick and drops all
    /// listeners. Every later call is a no-op.
    pub fn destroy(&mut self) {
        self.bump_timer();
        self.listeners = Listeners::default();
        self.destroyed = true;
    }

    // --- timer contract --------------------------------------------------

    /// Gravity interval for the current level:
    /// base * multiplier^(level - 1), floored at 1ms.
    pub fn drop_interval_ms(&self) -> u64 {
        let interval = self.config.base_drop_interval_ms as f64
            * self
                .config
                .level_speed_multiplier
                .powi(self.state.level.saturating_sub(1) as i32);
        (interval as u64).max(1)
    }

    /// Token for the currently valid tick schedule.
    pub fn tick_token(&self) -> TickToken {
        TickToken(self.timer_generation)
    }

    fn bump_timer(&mut self) {
        self.timer_generation = self.timer_generation.wrapping_add(1);
    }

    /// Gravity callback: behaves like a MoveDown. Returns false for a stale
    /// token or outside Playing; the host should then drop its timer and,
    /// if still playing, reschedule from a fresh `tick_token`.
    pub fn tick(&mut self, token: TickToken) -> bool {
        if self.destroyed || token != self.tick_token() || self.state.phase != Phase::Playing {
            return false;
        }
        self.state.elapsed_ms += self.drop_interval_ms();
        self.descend(false);
        true
    }

    // --- actions ---------------------------------------------------------

    /// Route a player action. Outside Playing this is a routine no-op (UI
    /// races are expected and harmless), reported as `false`.
    pub fn dispatch(&mut self, action: GameAction) -> bool {
        if self.destroyed || self.state.phase != Phase::Playing {
            return false;
        }
        match action {
            GameAction::MoveLeft => self.shift(-1),
            GameAction::MoveRight => self.shift(1),
            GameAction::MoveDown => self.descend(false),
            GameAction::SoftDrop => self.descend(true),
            GameAction::RotateCw => self.rotate(true),
            GameAction::RotateCcw => self.rotate(false),
            GameAction::HardDrop => self.hard_drop(),
        }
    }

    fn shift(&mut self, dx: i32) -> bool {
        let Some(piece) = self.state.current else {
            return false;
        };
        if !self.collision.check_move(&self.state.board, &piece, dx, 0).can_move {
            return false;
        }
        self.state.current = Some(piece.offset(dx, 0));
        self.last_action_was_rotation = false;
        self.notify_state();
        true
    }

    /// One-cell descent. A blocked descent locks the piece; `scored` adds
    /// the explicit soft-drop point on success.
    fn descend(&mut self, scored: bool) -> bool {
        let Some(piece) = self.state.current else {
            return false;
        };
        if self.collision.check_move(&self.state.board, &piece, 0, 1).can_move {
            self.state.current = Some(piece.offset(0, 1));
            if scored {
                self.state.score += soft_drop_score(&self.config.scoring, 1);
            }
            self.last_action_was_rotation = false;
            self.notify_state();
            return true;
        }
        self.lock_current();
        true
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        let Some(piece) = self.state.current else {
            return false;
        };
        let Some(rotated) = self
            .collision
            .resolve_rotation(&self.state.board, &piece, clockwise)
        else {
            return false;
        };
        self.state.current = Some(rotated);
        self.last_action_was_rotation = true;
        self.notify_state();
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(piece) = self.state.current else {
            return false;
        };
        let target_y = self.collision.drop_position(&self.state.board, &piece);
        let distance = (target_y - piece.y) as u32;
        self.state.current = Some(Piece { y: target_y, ..piece });
        self.state.score += hard_drop_score(&self.config.scoring, distance);
        self.lock_current();
        true
    }

    // --- lock pipeline ---------------------------------------------------

    /// Place the piece into the board, clear and score, spawn the next
    /// piece, and test for game over.
    fn lock_current(&mut self) {
        let Some(piece) = self.state.current.take() else {
            return;
        };
        for (x, y) in piece.cells() {
            // Cells above row 0 fall outside the stored grid; set() guards.
            self.state.board.set(x, y, Cell::Filled(piece.kind));
        }
        self.state.pieces_dropped += 1;

        let outcome = self
            .clears
            .check_and_clear(&mut self.state.board, self.last_action_was_rotation);
        self.state.combo = outcome.combo;

        let lines = outcome.lines_cleared();
        if lines > 0 {
            let table = &self.config.scoring;
            let level = self.state.level;

            let mut delta = if outcome.t_spin {
                t_spin_bonus(table, lines, level)
            } else {
                apply_line_score(table, lines, self.state.lines, level).score_delta
            };
            // The first clearing lock in a streak scores its line value
            // exactly; the bonus starts with the second.
            if outcome.combo > 1 {
                delta += combo_bonus(table, outcome.combo, level);
            }
            if outcome.perfect_clear {
                delta += perfect_clear_bonus(table, level);
            }
            self.state.score += delta;
            self.state.lines += lines as u32;

            let new_level = crate::scoring::level_for_lines(self.state.lines);
            if new_level > self.state.level {
                self.state.level = new_level;
                // Drop speed changed: cancel and reschedule, never mutate
                // the running timer in place.
                self.bump_timer();
            }

            let snapshot = self.snapshot();
            for listener in &self.listeners.lines_cleared {
                listener(lines as u32, &snapshot);
            }
        }

        self.spawn_next();
    }

    /// Draw the next piece and place it at the spawn anchor; an invalid
    /// spawn ends the game.
    fn spawn_next(&mut self) {
        let kind = self.bag.draw();
        let piece = Piece::spawn(kind, self.config.board_width);
        self.state.next = self.bag.peek();
        self.last_action_was_rotation = false;

        if self.collision.is_game_over(&self.state.board, &piece) {
            // Keep the colliding piece visible in the terminal snapshot.
            self.state.current = Some(piece);
            self.state.phase = Phase::GameOver;
            self.bump_timer();
            let snapshot = self.snapshot();
            for listener in &self.listeners.game_over {
                listener(&snapshot);
            }
            return;
        }

        self.state.current = Some(piece);
        self.notify_state();
    }

    // --- observers -------------------------------------------------------

    /// Register a listener for any successful state mutation.
    pub fn on_state_change(&mut self, listener: impl Fn(&GameSnapshot) + 'static) {
        if !self.destroyed {
            self.listeners.state_change.push(Box::new(listener));
        }
    }

    /// Register a listener fired once per clearing lock with the cleared
    /// line count.
    pub fn on_lines_cleared(&mut self, listener: impl Fn(u32, &GameSnapshot) + 'static) {
        if !self.destroyed {
            self.listeners.lines_cleared.push(Box::new(listener));
        }
    }

    /// Register a listener fired when the session transitions to GameOver.
    pub fn on_game_over(&mut self, listener: impl Fn(&GameSnapshot) + 'static) {
        if !self.destroyed {
            self.listeners.game_over.push(Box::new(listener));
        }
    }

    fn notify_state(&self) {
        if self.listeners.state_change.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in &self.listeners.state_change {
            listener(&snapshot);
        }
    }

    // --- queries ---------------------------------------------------------

    /// Immutable copy of the aggregate state.
    pub fn snapshot(&self) -> GameSnapshot {
        let ghost_y = self
            .state
            .current
            .map(|piece| self.collision.drop_position(&self.state.board, &piece));
        GameSnapshot {
            board: self.state.board.rows(),
            current: self.state.current.map(PieceSnapshot::from),
            ghost_y,
            next: self.state.next,
            score: self.state.score,
            level: self.state.level,
            lines: self.state.lines,
            combo: self.state.combo,
            is_playing: self.state.phase == Phase::Playing,
            is_paused: self.state.phase == Phase::Paused,
            is_game_over: self.state.phase == Phase::GameOver,
            elapsed_ms: self.state.elapsed_ms,
            pieces_dropped: self.state.pieces_dropped,
        }
    }

    /// End-of-game result shape for external collaborators.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.state.score,
            level: self.state.level,
            lines_cleared: self.state.lines,
            duration_seconds: self.state.elapsed_ms / 1000,
            pieces_dropped: self.state.pieces_dropped,
        }
    }

    /// Direct board access for scenario setup (puzzle layouts, tests).
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.state.board
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
