//! Rainbow Snake - a grid arcade game with stacked power-ups
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake, food, effect ledger, projectiles, session)
//! - `clock`: Injected monotonic time source
//! - `report`: Score submission and leaderboard contracts with the score service
//! - `settings`: Data-driven game configuration

pub mod clock;
pub mod report;
pub mod settings;
pub mod sim;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use report::{
    Leaderboard, LeaderboardEntry, LogReporter, ReportError, ScoreReporter, ScoreSubmission,
};
pub use settings::{EffectDurations, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions and cell size in pixels; the grid is their ratio
    pub const CANVAS_WIDTH: u32 = 320;
    pub const CANVAS_HEIGHT: u32 = 320;
    pub const CELL_SIZE: u32 = 20;

    /// Step interval before any speed modifier (ms)
    pub const BASE_TICK_MS: u64 = 144;
    /// Initial and minimum snake length
    pub const SNAKE_MIN_LENGTH: usize = 4;
    /// Steps the turn emphasis stays lit after a direction change
    pub const TURN_EMPHASIS_TICKS: u8 = 3;

    /// Chance that a respawned food is a power-up
    pub const POWER_UP_CHANCE: f64 = 0.5;
    /// Drifting food moves one cell every N steps
    pub const DRIFT_EVERY_TICKS: u32 = 3;
    /// Blinking food toggles visibility every N steps
    pub const BLINK_EVERY_TICKS: u32 = 4;
    /// Teleporting food jumps after this much real time (ms)
    pub const TELEPORT_INTERVAL_MS: u64 = 2_000;
    /// Reject-sampling attempts per grid cell before scanning for a free cell
    pub const RESPAWN_ATTEMPTS_PER_CELL: usize = 4;

    /// Speed factors (multiply the tick interval, < 1.0 is faster)
    pub const INFERNO_SPEED: f64 = 1.0 / 1.5;
    pub const SUPERSONIC_SPEED: f64 = 1.0 / 2.0;
    pub const ICE_SPEED: f64 = 2.0;
    /// Persistent factors applied by eating red / green food
    pub const RED_SPEED: f64 = 0.95;
    pub const GREEN_SPEED: f64 = 1.05;

    /// Score multiplier while the Multiplier effect runs
    pub const SCORE_MULTIPLIER: u64 = 2;
    /// Flat bonus granted by Gold Rush
    pub const GOLD_RUSH_BONUS: u64 = 250;

    /// Field effect radii (Manhattan distance)
    pub const REPULSOR_RADIUS: i32 = 3;
    pub const MAGNET_RADIUS: i32 = 4;
    /// Steps between two Turret auto-consumptions
    pub const TURRET_COOLDOWN_TICKS: u32 = 6;

    /// Projectile speed (cells per step)
    pub const PROJECTILE_SPEED: f32 = 2.0;
    /// Projectile lifetime (steps)
    pub const PROJECTILE_MAX_AGE: u32 = 12;
    /// Distance to the food center that counts as reaching it; half a step so no pass is skipped
    pub const PROJECTILE_HIT_TOLERANCE: f32 = PROJECTILE_SPEED / 2.0;
    /// Steps a projectile stays visible past the food
    pub const PROJECTILE_OVERSHOOT_TICKS: u32 = 2;

    /// Leaderboard rows kept for display
    pub const LEADERBOARD_SIZE: usize = 10;
}
