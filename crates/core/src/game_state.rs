//! Game state module - the piece controller state machine
//!
//! Ties together grid, pieces, bag queue, scoring, power-ups and rising lines.
//!
//! ```text
//! Spawning -> Falling <-> Locking -> (LineClearAnimating) -> Spawning
//!     |                                                          |
//!     +----------------------> GameOver <-----------------------+
//! ```
//!
//! Rows cleared by a lock stay visible during `LineClearAnimating`; the grid is
//! compacted when the animation window closes. Score, combo, level and power-up
//! activation are settled at lock time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::grid::{CellTag, Grid};
use crate::pieces::{get_shape, spawn_position, try_rotate, PieceShape, PowerTag};
use crate::powerups::{roll_power_tag, PowerUps};
use crate::rising::{roll_holes, RisingLines};
use crate::rng::PieceQueue;
use crate::scoring::{calculate_drop_score, calculate_level, calculate_score, fall_interval_ms};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, PowerCell, RisingSnapshot};
use crate::types::*;

/// Mixed into the seed so game rolls and the bag use separate streams
const ROLL_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    pub power: Option<PowerTag>,
}

impl Tetromino {
    /// A new piece at the spawn origin of a `width`-column grid
    pub fn new(kind: PieceKind, width: u8) -> Self {
        let (x, y) = spawn_position(width);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
            power: None,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    pub fn moved(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Absolute grid coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn is_valid(&self, grid: &Grid) -> bool {
        grid.can_place(&self.shape(), self.x, self.y)
    }

    pub fn is_grounded(&self, grid: &Grid) -> bool {
        !grid.can_place(&self.shape(), self.x, self.y + 1)
    }
}

/// Contents of the hold slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HeldPiece {
    pub kind: PieceKind,
    pub power: Option<PowerTag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locking { remaining_ms: u32 },
    LineClearAnimating { remaining_ms: u32, rows: Vec<usize> },
    GameOver,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Spawning => PhaseKind::Spawning,
            Phase::Falling => PhaseKind::Falling,
            Phase::Locking { .. } => PhaseKind::Locking,
            Phase::LineClearAnimating { .. } => PhaseKind::LineClearAnimating,
            Phase::GameOver => PhaseKind::GameOver,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    grid: Grid,
    phase: Phase,
    active: Option<Tetromino>,
    hold: Option<HeldPiece>,
    can_hold: bool,
    next_queue: [PieceKind; NEXT_PREVIEW_LEN],
    piece_queue: PieceQueue,
    /// Charged-block and rising-hole rolls
    rng: StdRng,
    /// Monotonic episode id (increments on restart)
    episode_id: u32,
    pieces_locked: u32,
    last_event: Option<LockEvent>,
    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    combo_multiplier: f64,
    gravity_ms: u32,
    paused: bool,
    power_ups: PowerUps,
    rising: RisingLines,
}

impl GameState {
    /// Create a game in `Spawning`; call [`start`](Self::start) or `tick` to spawn.
    ///
    /// `config` is taken as already validated; use [`try_new`](Self::try_new)
    /// for configs from outside the process.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let piece_queue = PieceQueue::new(seed);
        let next_queue = piece_queue.peek_preview();
        Self {
            grid: Grid::new(config.grid.width, config.grid.height),
            phase: Phase::Spawning,
            active: None,
            hold: None,
            can_hold: true,
            next_queue,
            piece_queue,
            rng: StdRng::seed_from_u64(seed ^ ROLL_STREAM_SALT),
            episode_id: 0,
            pieces_locked: 0,
            last_event: None,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            combo_multiplier: config.scoring.combo_multiplier_base,
            gravity_ms: 0,
            paused: false,
            power_ups: PowerUps::new(),
            rising: RisingLines::new(&config.rising),
            config,
        }
    }

    /// Validate `config` before building the game
    pub fn try_new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    /// Spawn the first piece
    pub fn start(&mut self) {
        if self.phase == Phase::Spawning {
            self.spawn_piece();
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for scenario setup
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn hold_piece(&self) -> Option<HeldPiece> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold && self.config.hold_enabled
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_PREVIEW_LEN] {
        &self.next_queue
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    /// Multiplier applied to the most recent clear (base after a non-clearing lock)
    pub fn combo_multiplier(&self) -> f64 {
        self.combo_multiplier
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn power_ups(&self) -> &PowerUps {
        &self.power_ups
    }

    /// Mutable power-up state for scenario setup
    pub fn power_ups_mut(&mut self) -> &mut PowerUps {
        &mut self.power_ups
    }

    pub fn rising(&self) -> &RisingLines {
        &self.rising
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    fn phantom_active(&self) -> bool {
        self.power_ups.is_active(PowerUpKind::PhantomMode)
    }

    /// Current gravity interval
    pub fn fall_interval_ms(&self) -> u32 {
        fall_interval_ms(
            self.level,
            self.power_ups.is_active(PowerUpKind::TimeDilator),
            &self.config.timing,
        )
    }

    /// Lock delay a grounded piece gets right now
    pub fn lock_delay_ms(&self) -> u32 {
        if self.power_ups.is_active(PowerUpKind::PrecisionLock) {
            self.config.power_ups.precision_lock_delay_ms
        } else {
            self.config.timing.lock_delay_ms
        }
    }

    /// Draw the next piece and place it at the spawn origin.
    ///
    /// Ends the game if the spawn position is blocked.
    pub fn spawn_piece(&mut self) -> bool {
        let kind = self.piece_queue.draw();
        self.next_queue = self.piece_queue.peek_preview();

        let mut piece = Tetromino::new(kind, self.grid.width());
        piece.power = roll_power_tag(&mut self.rng, &self.config.power_ups);
        self.place_new_active(piece)
    }

    fn place_new_active(&mut self, piece: Tetromino) -> bool {
        if !piece.is_valid(&self.grid) {
            self.active = None;
            self.phase = Phase::GameOver;
            return false;
        }
        self.active = Some(piece);
        self.phase = Phase::Falling;
        self.can_hold = true;
        self.gravity_ms = 0;
        true
    }

    fn is_controllable(&self) -> bool {
        !self.paused && matches!(self.phase, Phase::Falling | Phase::Locking { .. })
    }

    /// Horizontal and rotational fit: Phantom mode only enforces bounds
    fn fits_lateral(&self, piece: &Tetromino) -> bool {
        if self.phantom_active() {
            self.grid.fits_bounds(&piece.shape(), piece.x, piece.y)
        } else {
            piece.is_valid(&self.grid)
        }
    }

    fn can_fall(&self) -> bool {
        self.active.is_some_and(|p| !p.is_grounded(&self.grid))
    }

    /// A grounded piece that can fall again goes back to `Falling`
    fn release_lock_if_airborne(&mut self) {
        if matches!(self.phase, Phase::Locking { .. }) && self.can_fall() {
            self.phase = Phase::Falling;
            self.gravity_ms = 0;
        }
    }

    pub fn try_shift(&mut self, dx: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let candidate = active.moved(dx, 0);
        if !self.fits_lateral(&candidate) {
            return false;
        }
        self.active = Some(candidate);
        self.release_lock_if_airborne();
        true
    }

    pub fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let phantom = self.phantom_active();
        let grid = &self.grid;
        let result = try_rotate(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            clockwise,
            |x, y| {
                if phantom {
                    grid.in_bounds(x, y)
                } else {
                    grid.is_valid(x, y)
                }
            },
        );

        let Some((_shape, rotation, (dx, dy))) = result else {
            return false;
        };
        self.active = Some(Tetromino {
            rotation,
            x: active.x + dx,
            y: active.y + dy,
            ..active
        });
        self.release_lock_if_airborne();
        true
    }

    /// One row down under normal collision
    fn try_fall(&mut self) -> bool {
        match self.active {
            Some(active) if !active.is_grounded(&self.grid) => {
                self.active = Some(active.moved(0, 1));
                true
            }
            _ => false,
        }
    }

    pub fn soft_drop(&mut self) -> bool {
        if !self.try_fall() {
            return false;
        }
        self.score = self
            .score
            .saturating_add(calculate_drop_score(1, false, &self.config.scoring));
        self.gravity_ms = 0;
        self.release_lock_if_airborne();
        true
    }

    /// Drop to the ghost row and lock. Returns the drop bonus awarded.
    pub fn hard_drop(&mut self) -> u32 {
        let (Some(active), Some(ghost_y)) = (self.active, self.ghost_y()) else {
            return 0;
        };
        let distance = (ghost_y - active.y) as u32;
        self.active = Some(Tetromino {
            y: ghost_y,
            ..active
        });
        let bonus = calculate_drop_score(distance, true, &self.config.scoring);
        self.score = self.score.saturating_add(bonus);
        self.lock_piece();
        bonus
    }

    /// Row the active piece would rest on after a hard drop
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        let shape = active.shape();
        let mut y = active.y;
        while self.grid.can_place(&shape, active.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Swap the active piece with the hold slot (once per piece)
    pub fn hold(&mut self) -> bool {
        if !self.can_hold() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let parked = HeldPiece {
            kind: active.kind,
            power: active.power,
        };
        match self.hold.replace(parked) {
            Some(held) => {
                let piece = Tetromino {
                    power: held.power,
                    ..Tetromino::new(held.kind, self.grid.width())
                };
                self.place_new_active(piece);
            }
            None => {
                self.spawn_piece();
            }
        }

        self.can_hold = false;
        true
    }

    /// Lock the active piece and settle the line clear
    pub fn lock_piece(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let shape = piece.shape();
        let tag = CellTag::Piece(piece.kind);
        let phantom = self.phantom_active();
        let locked = if phantom {
            self.power_ups.consume_use(PowerUpKind::PhantomMode);
            self.grid.overwrite(&shape, piece.x, piece.y, tag, piece.power)
        } else {
            self.grid.lock(&shape, piece.x, piece.y, tag, piece.power)
        };
        if locked.is_err() {
            self.phase = Phase::GameOver;
            return;
        }

        self.pieces_locked = self.pieces_locked.wrapping_add(1);

        let rows = self.grid.find_full_rows();
        let mut event = LockEvent {
            kind: piece.kind,
            lines_cleared: rows.len() as u32,
            line_clear_score: 0,
            combo: 0,
            multiplier: self.config.scoring.combo_multiplier_base,
            activated: Vec::new(),
            phantom,
        };

        if rows.is_empty() {
            self.combo = 0;
            self.combo_multiplier = self.config.scoring.combo_multiplier_base;
            self.last_event = Some(event);
            self.spawn_piece();
            return;
        }

        let amplified = self.power_ups.is_active(PowerUpKind::ScoreAmplifier);
        let result = calculate_score(
            rows.len(),
            self.level,
            self.combo,
            amplified,
            &self.config.scoring,
        );
        self.score = self.score.saturating_add(result.total);
        self.combo += 1;
        self.combo_multiplier = result.multiplier;
        self.lines += rows.len() as u32;
        self.level = calculate_level(self.lines, &self.config.scoring);

        let activated = self.grid.power_tags_in_rows(&rows);
        for &kind in &activated {
            self.power_ups.activate(kind, &self.config.power_ups);
        }

        event.line_clear_score = result.total;
        event.combo = self.combo;
        event.multiplier = result.multiplier;
        event.activated = activated;
        self.last_event = Some(event);

        let remaining_ms = self.config.timing.clear_animation_ms;
        if remaining_ms == 0 {
            self.finish_line_clear(&rows);
        } else {
            self.phase = Phase::LineClearAnimating { remaining_ms, rows };
        }
    }

    fn finish_line_clear(&mut self, rows: &[usize]) {
        self.grid.clear_and_compact(rows);
        self.phase = Phase::Spawning;
        self.spawn_piece();
    }

    /// Spend one Line-Bomb use on the lowest occupied row
    pub fn activate_bomb(&mut self) -> bool {
        if !self.power_ups.is_active(PowerUpKind::LineBomb) {
            return false;
        }
        let Some(row) = self.grid.lowest_occupied_row() else {
            return false;
        };
        if !self.power_ups.consume_use(PowerUpKind::LineBomb) {
            return false;
        }
        self.grid.clear_and_compact(&[row]);
        self.resettle_active();
        true
    }

    /// Push the active piece up until it no longer overlaps the stack
    fn resettle_active(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        if self.phantom_active() || active.is_valid(&self.grid) {
            return;
        }
        let lifted = (1..=self.grid.height() as i8)
            .map(|dy| active.moved(0, -dy))
            .find(|p| p.is_valid(&self.grid));
        match lifted {
            Some(piece) => self.active = Some(piece),
            None => self.phase = Phase::GameOver,
        }
    }

    /// Insert a rising row under the stack
    fn rise(&mut self) {
        let holes = roll_holes(&mut self.rng, self.grid.width(), &self.config.rising);
        if self.grid.insert_bottom_row(&holes, CellTag::Garbage).is_err() {
            self.phase = Phase::GameOver;
            return;
        }
        self.rising.on_rise(self.level, &self.config.rising);

        let Some(active) = self.active else {
            return;
        };
        let phantom = self.phantom_active();
        let fits = |p: &Tetromino| {
            if phantom {
                self.grid.fits_bounds(&p.shape(), p.x, p.y)
            } else {
                p.is_valid(&self.grid)
            }
        };
        let raised = active.moved(0, -1);
        if fits(&raised) {
            self.active = Some(raised);
        } else if !fits(&active) {
            self.phase = Phase::GameOver;
        }
    }

    /// Manual rising-lines trigger
    pub fn trigger_rise(&mut self) -> bool {
        if !self.rising.can_trigger() {
            return false;
        }
        self.rise();
        true
    }

    /// Advance time by `elapsed_ms`. Returns true if the playfield changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if self.paused || self.phase == Phase::GameOver {
            return false;
        }
        if self.phase == Phase::Spawning {
            self.spawn_piece();
            return true;
        }

        self.power_ups.tick(elapsed_ms);

        if let Phase::LineClearAnimating { remaining_ms, rows } = &mut self.phase {
            *remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
            if *remaining_ms > 0 {
                return false;
            }
            let rows = std::mem::take(rows);
            self.finish_line_clear(&rows);
            return true;
        }

        let mut changed = false;
        if self.rising.tick(elapsed_ms) {
            self.rise();
            changed = true;
            if self.phase == Phase::GameOver {
                return true;
            }
        }

        match self.phase {
            Phase::Falling => {
                let interval = self.fall_interval_ms();
                self.gravity_ms = self.gravity_ms.saturating_add(elapsed_ms);
                while self.gravity_ms >= interval {
                    self.gravity_ms -= interval;
                    if !self.try_fall() {
                        self.gravity_ms = 0;
                        self.enter_locking();
                        break;
                    }
                    changed = true;
                }
            }
            Phase::Locking { remaining_ms } => {
                if self.can_fall() {
                    self.phase = Phase::Falling;
                    self.gravity_ms = 0;
                } else {
                    let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
                    if remaining_ms == 0 {
                        self.lock_piece();
                        changed = true;
                    } else {
                        self.phase = Phase::Locking { remaining_ms };
                    }
                }
            }
            _ => {}
        }
        changed
    }

    fn enter_locking(&mut self) {
        let remaining_ms = self.lock_delay_ms();
        if remaining_ms == 0 {
            self.lock_piece();
        } else {
            self.phase = Phase::Locking { remaining_ms };
        }
    }

    /// Apply an intent. Returns false when it was a no-op.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => {
                if self.game_over() {
                    return false;
                }
                self.paused = !self.paused;
                true
            }
            GameAction::Restart => {
                self.restart();
                true
            }
            // Demo mode lives in the engine's session.
            GameAction::ToggleDemo => false,
            _ if !self.is_controllable() => false,
            GameAction::MoveLeft => self.try_shift(-1),
            GameAction::MoveRight => self.try_shift(1),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
            GameAction::RotateCw => self.try_rotate(true),
            GameAction::RotateCcw => self.try_rotate(false),
            GameAction::Hold => self.hold(),
            GameAction::ActivateBomb => self.activate_bomb(),
            GameAction::TriggerRise => self.trigger_rise(),
        }
    }

    /// Apply an optional intent, then advance time
    pub fn step(&mut self, elapsed_ms: u32, intent: Option<GameAction>) -> bool {
        let acted = intent.is_some_and(|a| self.apply_action(a));
        let ticked = self.tick(elapsed_ms);
        acted || ticked
    }

    /// Reinitialise everything but the config and start a new episode.
    ///
    /// The new game's seed is drawn from the current roll stream, so a run of
    /// restarts stays reproducible from the first seed.
    pub fn restart(&mut self) {
        let next_seed = self.rng.random::<u64>();
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(self.config.clone(), next_seed);
        self.episode_id = next_episode;
        self.start();
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.grid = self.grid.to_u8_rows();
        out.power_cells.clear();
        for (i, cell) in self.grid.cells().iter().enumerate() {
            if let Some(kind) = cell.and_then(|b| b.power) {
                let w = self.grid.width() as usize;
                out.power_cells.push(PowerCell {
                    x: (i % w) as u8,
                    y: (i / w) as u8,
                    kind,
                });
            }
        }
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.hold = self.hold;
        out.next_queue = self.next_queue;
        out.can_hold = self.can_hold();
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.combo = self.combo;
        out.combo_multiplier = self.combo_multiplier;
        out.power_ups = self.power_ups.statuses();
        out.rising = RisingSnapshot {
            mode: self.rising.mode(),
            countdown_ms: self.rising.countdown_ms(),
            warning: self.rising.warning(&self.config.rising),
            cooldown_ms: self.rising.cooldown_ms(),
        };
        out.phase = self.phase.kind();
        out.clearing_rows = match &self.phase {
            Phase::LineClearAnimating { rows, .. } => rows.clone(),
            _ => Vec::new(),
        };
        out.paused = self.paused;
        out.game_over = self.game_over();
        out.episode_id = self.episode_id;
        out.pieces_locked = self.pieces_locked;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default(), 1)
    }
}
