//! Session state and render snapshot
//!
//! Everything the tick loop mutates lives on [`Session`]; the host only ever
//! sees the [`Snapshot`] it returns.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffect, EffectLedger, Portals};
use super::food::{Food, FoodKind, PowerUp, SpawnRules};
use super::grid::{Coord, Direction, Grid};
use super::intro::IntroPath;
use super::projectile::Projectiles;
use super::snake::{Segment, Snake};
use crate::clock::Clock;
use crate::report::{Leaderboard, ScoreReporter};
use crate::settings::{Settings, SettingsError};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Attract-mode demo, no scoring and no collisions
    Intro,
    /// Active gameplay
    Running,
    /// Host is hidden
    Paused,
    /// Run just ended; shown for one frame
    GameOver,
    /// Waiting for a reset
    Stopped,
}

/// Things that happened during a tick, for audio and haptics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    FoodEaten { kind: FoodKind, points: u64 },
    PowerUpActivated { power_up: PowerUp },
    ShieldAbsorbed,
    ShotFired { hit: bool },
    GameOver { score: u64, won: bool },
}

/// Food as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoodView {
    pub pos: Coord,
    pub kind: FoodKind,
    pub visible: bool,
    /// Flat color twice, or a power-up's gradient pair
    pub palette: [&'static str; 2],
}

/// Read-only view of a session after a tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub status: SessionStatus,
    pub score: u64,
    pub won: bool,
    /// Head first
    pub segments: Vec<Segment>,
    pub direction: Direction,
    pub turn_emphasis: u8,
    pub food: FoodView,
    /// Shot positions in cell units
    pub projectiles: Vec<Vec2>,
    pub effects: Vec<ActiveEffect>,
    pub shield_charge: u8,
    pub laser_charged: bool,
    pub controls_inverted: bool,
    pub portals: Option<Portals>,
    /// Current step interval
    pub tick_ms: u64,
    pub events: Vec<GameEvent>,
    pub leaderboard: Leaderboard,
}

/// One game session
pub struct Session {
    pub(crate) settings: Settings,
    pub(crate) grid: Grid,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) reporter: Option<Box<dyn ScoreReporter>>,
    pub(crate) rng: Pcg32,
    pub(crate) status: SessionStatus,
    pub(crate) snake: Snake,
    pub(crate) food: Food,
    pub(crate) spawn_rules: SpawnRules,
    pub(crate) effects: EffectLedger,
    pub(crate) projectiles: Projectiles,
    pub(crate) score: u64,
    /// Persistent step factor from red and green food
    pub(crate) speed_factor: f64,
    pub(crate) intro: IntroPath,
    pub(crate) accumulator_ms: u64,
    /// Latest direction intent, applied on the next step
    pub(crate) pending_direction: Option<Direction>,
    pub(crate) score_reported: bool,
    pub(crate) won: bool,
    pub(crate) leaderboard: Leaderboard,
    pub(crate) events: Vec<GameEvent>,
    /// Steps taken since the board was built
    pub(crate) steps: u64,
}

impl Session {
    /// Build a session in the intro state
    pub fn new(settings: Settings, clock: Box<dyn Clock>) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = Grid::new(settings.width, settings.height);
        let spawn_rules = SpawnRules::from_settings(&settings);
        let snake = Snake::new(settings.initial_length, grid.height / 2);
        let now = clock.now_ms();
        let food = Food::spawn(&spawn_rules, |c| snake.occupies(c), &mut rng, now);
        log::info!(
            "Session created: {}x{} grid, seed {}, test mode {}",
            grid.width,
            grid.height,
            seed,
            settings.test_mode
        );

        Ok(Self {
            effects: EffectLedger::new(settings.durations.clone()),
            intro: IntroPath::new(grid),
            settings,
            grid,
            clock,
            reporter: None,
            rng,
            status: SessionStatus::Intro,
            snake,
            food,
            spawn_rules,
            projectiles: Projectiles::new(),
            score: 0,
            speed_factor: 1.0,
            accumulator_ms: 0,
            pending_direction: None,
            score_reported: false,
            won: false,
            leaderboard: Leaderboard::new(),
            events: Vec::new(),
            steps: 0,
        })
    }

    /// Attach the collaborator that receives the final score
    pub fn with_reporter(mut self, reporter: Box<dyn ScoreReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Replace the leaderboard shown in snapshots
    pub fn set_leaderboard(&mut self, leaderboard: Leaderboard) {
        self.leaderboard = leaderboard;
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn effects(&self) -> &EffectLedger {
        &self.effects
    }

    pub fn projectiles(&self) -> &Projectiles {
        &self.projectiles
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Fresh snake, food, score and effects
    pub(crate) fn rebuild_board(&mut self) {
        let now = self.clock.now_ms();
        self.snake = Snake::new(self.settings.initial_length, self.grid.height / 2);
        let snake = &self.snake;
        self.food = Food::spawn(&self.spawn_rules, |c| snake.occupies(c), &mut self.rng, now);
        self.effects.clear();
        self.projectiles.clear();
        self.score = 0;
        self.speed_factor = 1.0;
        self.accumulator_ms = 0;
        self.pending_direction = None;
        self.score_reported = false;
        self.won = false;
        self.steps = 0;
    }

    /// Current view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now_ms();
        Snapshot {
            status: self.status,
            score: self.score,
            won: self.won,
            segments: self.snake.segments().copied().collect(),
            direction: self.snake.direction(),
            turn_emphasis: self.snake.turn_emphasis(),
            food: FoodView {
                pos: self.food.pos,
                kind: self.food.kind,
                visible: self.food.visible,
                palette: self.food.kind.palette(),
            },
            projectiles: self.projectiles.positions(),
            effects: self.effects.active(now),
            shield_charge: self.effects.shield_charge(),
            laser_charged: self.effects.laser_charged(),
            controls_inverted: self.effects.controls_inverted(now),
            portals: self.effects.portals(now),
            tick_ms: self.current_tick_ms(),
            events: self.events.clone(),
            leaderboard: self.leaderboard.clone(),
        }
    }

    /// Effective step interval right now
    pub fn current_tick_ms(&self) -> u64 {
        let now = self.clock.now_ms();
        let ms = self.settings.base_tick_ms as f64
            * self.speed_factor
            * self.effects.speed_multiplier(now);
        ms.round().max(1.0) as u64
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("score", &self.score)
            .field("snake_len", &self.snake.len())
            .field("food", &self.food.pos)
            .field("steps", &self.steps)
            .finish()
    }
}
