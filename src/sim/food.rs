//! Food and its spawner
//!
//! Every food is either one of six rainbow colors or a power-up. Some kinds
//! move on their own: blue food drifts sideways, orange food blinks and the
//! Phase power-up teleports.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use super::grid::{Coord, Grid};
use super::snake::SegmentTag;
use crate::consts::*;
use crate::settings::Settings;

/// Plain food colors, in rotation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rainbow {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
}

impl Rainbow {
    pub const ALL: [Rainbow; 6] = [
        Rainbow::Red,
        Rainbow::Orange,
        Rainbow::Yellow,
        Rainbow::Green,
        Rainbow::Blue,
        Rainbow::Violet,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Rainbow::Red => "#ff4136",
            Rainbow::Orange => "#ff851b",
            Rainbow::Yellow => "#ffdc00",
            Rainbow::Green => "#2ecc40",
            Rainbow::Blue => "#0074d9",
            Rainbow::Violet => "#b10dc9",
        }
    }
}

/// Power-up food kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerUp {
    Inferno,
    Ice,
    Phase,
    BlackHole,
    Supersonic,
    Shield,
    Multiplier,
    Repulsor,
    Magnet,
    Laser,
    Emp,
    Turret,
    Wormhole,
    GoldRush,
}

impl PowerUp {
    /// Default spawn pool
    pub const CLASSIC: [PowerUp; 9] = [
        PowerUp::Inferno,
        PowerUp::Ice,
        PowerUp::Phase,
        PowerUp::BlackHole,
        PowerUp::Supersonic,
        PowerUp::Shield,
        PowerUp::Multiplier,
        PowerUp::Repulsor,
        PowerUp::Magnet,
    ];

    pub const ALL: [PowerUp; 14] = [
        PowerUp::Inferno,
        PowerUp::Ice,
        PowerUp::Phase,
        PowerUp::BlackHole,
        PowerUp::Supersonic,
        PowerUp::Shield,
        PowerUp::Multiplier,
        PowerUp::Repulsor,
        PowerUp::Magnet,
        PowerUp::Laser,
        PowerUp::Emp,
        PowerUp::Turret,
        PowerUp::Wormhole,
        PowerUp::GoldRush,
    ];

    /// Timed effect installed when eaten; None for instant power-ups
    pub fn effect(self) -> Option<EffectKind> {
        match self {
            PowerUp::Inferno => Some(EffectKind::SpeedBoost),
            PowerUp::Ice => Some(EffectKind::Slow),
            PowerUp::Phase => Some(EffectKind::Ghost),
            PowerUp::BlackHole => Some(EffectKind::InvertControls),
            PowerUp::Supersonic => Some(EffectKind::Sprint),
            PowerUp::Shield => Some(EffectKind::Shield),
            PowerUp::Multiplier => Some(EffectKind::ScoreMultiplier),
            PowerUp::Repulsor => Some(EffectKind::Repulsion),
            PowerUp::Magnet => Some(EffectKind::Attraction),
            PowerUp::Emp => Some(EffectKind::AreaClear),
            PowerUp::Turret => Some(EffectKind::AutoConsume),
            PowerUp::Wormhole => Some(EffectKind::Teleport),
            PowerUp::Laser | PowerUp::GoldRush => None,
        }
    }

    /// Two-color gradient used to draw the power-up
    pub fn gradient(self) -> (&'static str, &'static str) {
        match self {
            PowerUp::Inferno => ("#ff3d00", "#ffc400"),
            PowerUp::Ice => ("#80d8ff", "#e1f5fe"),
            PowerUp::Phase => ("#b388ff", "#ede7f6"),
            PowerUp::BlackHole => ("#212121", "#7c4dff"),
            PowerUp::Supersonic => ("#00e5ff", "#ffffff"),
            PowerUp::Shield => ("#2979ff", "#b2ebf2"),
            PowerUp::Multiplier => ("#ffd600", "#ff6d00"),
            PowerUp::Repulsor => ("#ff1744", "#ff80ab"),
            PowerUp::Magnet => ("#d50000", "#9e9e9e"),
            PowerUp::Laser => ("#76ff03", "#ccff90"),
            PowerUp::Emp => ("#ffea00", "#00b0ff"),
            PowerUp::Turret => ("#607d8b", "#cfd8dc"),
            PowerUp::Wormhole => ("#311b92", "#00bfa5"),
            PowerUp::GoldRush => ("#ffab00", "#fff59d"),
        }
    }
}

/// What the current food is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FoodKind {
    Plain(Rainbow),
    PowerUp(PowerUp),
}

/// Autonomous behavior of a food kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Still,
    Drift,
    Blink,
    Teleport,
}

impl FoodKind {
    pub fn motion(self) -> Motion {
        match self {
            FoodKind::Plain(Rainbow::Blue) => Motion::Drift,
            FoodKind::Plain(Rainbow::Orange) => Motion::Blink,
            FoodKind::PowerUp(PowerUp::Phase) => Motion::Teleport,
            FoodKind::Plain(_) | FoodKind::PowerUp(_) => Motion::Still,
        }
    }

    /// Fill colors for the renderer: a flat color or a power-up gradient
    pub fn palette(self) -> [&'static str; 2] {
        match self {
            FoodKind::Plain(color) => [color.hex(); 2],
            FoodKind::PowerUp(power_up) => {
                let (from, to) = power_up.gradient();
                [from, to]
            }
        }
    }

    /// Tag given to the segment grown from this food
    pub fn segment_tag(self) -> SegmentTag {
        match self {
            FoodKind::Plain(color) => SegmentTag::Color(color),
            FoodKind::PowerUp(power_up) => SegmentTag::PowerUp(power_up),
        }
    }
}

/// Spawn and motion rules taken from settings
#[derive(Debug, Clone)]
pub struct SpawnRules {
    pub grid: Grid,
    pub power_up_chance: f64,
    pub pool: Vec<PowerUp>,
    pub test_mode: bool,
}

impl SpawnRules {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            grid: Grid::new(settings.width, settings.height),
            power_up_chance: settings.power_up_chance,
            pool: settings.power_up_pool.clone(),
            test_mode: settings.test_mode,
        }
    }
}

/// Find a free cell by reject sampling, then by scanning the board
///
/// Sampling is capped at a few attempts per cell; the scan picks uniformly
/// among the remaining free cells. None only when the board is full.
pub fn place<R: Rng>(
    grid: Grid,
    is_occupied: impl Fn(Coord) -> bool,
    rng: &mut R,
) -> Option<Coord> {
    let attempts = grid.cells().saturating_mul(RESPAWN_ATTEMPTS_PER_CELL);
    for _ in 0..attempts {
        let candidate = grid.random_cell(rng);
        if !is_occupied(candidate) {
            return Some(candidate);
        }
    }

    let free: Vec<Coord> = grid.iter().filter(|&c| !is_occupied(c)).collect();
    if free.is_empty() {
        return None;
    }
    log::debug!("Reject sampling exhausted, picking from {} free cells", free.len());
    Some(free[rng.random_range(0..free.len())])
}

/// The current consumable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub pos: Coord,
    pub kind: FoodKind,
    /// Blinking food is drawn only when visible; it stays collectible either way
    pub visible: bool,
    drift_dir: i32,
    drift_counter: u32,
    blink_counter: u32,
    last_teleport_ms: u64,
    last_color: Option<Rainbow>,
}

impl Food {
    /// Food at a fixed cell
    pub fn placed(pos: Coord, kind: FoodKind) -> Self {
        Self {
            pos,
            kind,
            visible: true,
            drift_dir: 1,
            drift_counter: 0,
            blink_counter: 0,
            last_teleport_ms: 0,
            last_color: match kind {
                FoodKind::Plain(color) => Some(color),
                FoodKind::PowerUp(_) => None,
            },
        }
    }

    /// Fresh food away from the snake
    pub fn spawn<R: Rng>(
        rules: &SpawnRules,
        is_occupied: impl Fn(Coord) -> bool,
        rng: &mut R,
        now_ms: u64,
    ) -> Self {
        let mut food = Self::placed(Coord::new(0, 0), FoodKind::Plain(Rainbow::Red));
        food.last_color = None;
        food.respawn(rules, is_occupied, rng, now_ms);
        food
    }

    /// Pick a new cell and kind, resetting motion state
    ///
    /// Returns false if the board had no free cell; the food then stays put.
    pub fn respawn<R: Rng>(
        &mut self,
        rules: &SpawnRules,
        is_occupied: impl Fn(Coord) -> bool,
        rng: &mut R,
        now_ms: u64,
    ) -> bool {
        let Some(pos) = place(rules.grid, is_occupied, rng) else {
            log::warn!("No free cell left for food");
            return false;
        };
        self.pos = pos;
        self.kind = self.pick_kind(rules, rng);
        self.visible = true;
        self.drift_dir = 1;
        self.drift_counter = 0;
        self.blink_counter = 0;
        self.last_teleport_ms = now_ms;
        log::debug!("Food respawned at ({}, {}) as {:?}", pos.x, pos.y, self.kind);
        true
    }

    fn pick_kind<R: Rng>(&mut self, rules: &SpawnRules, rng: &mut R) -> FoodKind {
        if !rules.test_mode && !rules.pool.is_empty() && rng.random::<f64>() < rules.power_up_chance
        {
            let roll: f64 = rng.random();
            let bin = ((roll * rules.pool.len() as f64) as usize).min(rules.pool.len() - 1);
            return FoodKind::PowerUp(rules.pool[bin]);
        }

        let mut color = Rainbow::ALL[rng.random_range(0..Rainbow::ALL.len())];
        if Some(color) == self.last_color {
            // One redraw so consecutive foods usually look different
            color = Rainbow::ALL[rng.random_range(0..Rainbow::ALL.len())];
        }
        self.last_color = Some(color);
        FoodKind::Plain(color)
    }

    /// Per-step autonomous behavior
    pub fn tick_move<R: Rng>(
        &mut self,
        rules: &SpawnRules,
        is_occupied: impl Fn(Coord) -> bool,
        rng: &mut R,
        now_ms: u64,
    ) {
        if rules.test_mode {
            return;
        }
        match self.kind.motion() {
            Motion::Still => {}
            Motion::Drift => {
                self.drift_counter += 1;
                if self.drift_counter % DRIFT_EVERY_TICKS != 0 {
                    return;
                }
                let blocked = |c: Coord| !rules.grid.contains(c) || is_occupied(c);
                let ahead = Coord::new(self.pos.x + self.drift_dir, self.pos.y);
                if blocked(ahead) {
                    self.drift_dir = -self.drift_dir;
                    let back = Coord::new(self.pos.x + self.drift_dir, self.pos.y);
                    if !blocked(back) {
                        self.pos = back;
                    }
                } else {
                    self.pos = ahead;
                }
            }
            Motion::Blink => {
                self.blink_counter += 1;
                if self.blink_counter % BLINK_EVERY_TICKS == 0 {
                    self.visible = !self.visible;
                }
            }
            Motion::Teleport => {
                if now_ms.saturating_sub(self.last_teleport_ms) >= TELEPORT_INTERVAL_MS {
                    if let Some(pos) = place(rules.grid, is_occupied, rng) {
                        log::debug!("Food teleported to ({}, {})", pos.x, pos.y);
                        self.pos = pos;
                    }
                    self.last_teleport_ms = now_ms;
                }
            }
        }
    }
}
