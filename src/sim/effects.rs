//! Timed effect ledger
//!
//! Maps each active effect to its expiry time. Queries compare against `now`
//! on every call, so nothing has to be ticked down and an expired entry is
//! simply ignored.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::food::PowerUp;
use super::grid::{Coord, Grid};
use crate::consts::*;
use crate::settings::EffectDurations;

/// Timed gameplay modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    SpeedBoost,
    Slow,
    Ghost,
    InvertControls,
    Sprint,
    Shield,
    ScoreMultiplier,
    Attraction,
    Repulsion,
    AutoConsume,
    Teleport,
    AreaClear,
}

/// Linked teleport cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portals {
    pub a: Coord,
    pub b: Coord,
}

impl Portals {
    /// Exit for a head standing on either end
    pub fn exit_for(&self, c: Coord) -> Option<Coord> {
        if c == self.a {
            Some(self.b)
        } else if c == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Result of applying a power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A timed effect now runs until the given time
    Timed { kind: EffectKind, until_ms: u64 },
    /// Instant score bonus
    Bonus(u64),
    /// The laser holds one shot
    LaserCharged,
}

/// Continuous field effects for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOutcome {
    pub food: Coord,
    pub head: Coord,
    /// Turret fired: consume the food as if the head had reached it
    pub auto_consume: bool,
    pub teleported: bool,
}

/// An effect still running, for the render snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct EffectLedger {
    until: BTreeMap<EffectKind, u64>,
    shield_charge: u8,
    laser_charged: bool,
    portals: Option<Portals>,
    turret_cooldown: u32,
    durations: EffectDurations,
}

impl EffectLedger {
    pub fn new(durations: EffectDurations) -> Self {
        Self {
            durations,
            ..Self::default()
        }
    }

    /// Install or refresh `kind` until `now + duration`
    ///
    /// Refreshing resets the expiry instead of extending it. AreaClear wipes
    /// every other effect first.
    pub fn activate(&mut self, kind: EffectKind, now: u64) -> u64 {
        match kind {
            EffectKind::Shield => self.shield_charge = 1,
            EffectKind::AutoConsume => self.turret_cooldown = 0,
            EffectKind::AreaClear => self.clear(),
            EffectKind::SpeedBoost
            | EffectKind::Slow
            | EffectKind::Ghost
            | EffectKind::InvertControls
            | EffectKind::Sprint
            | EffectKind::ScoreMultiplier
            | EffectKind::Attraction
            | EffectKind::Repulsion
            | EffectKind::Teleport => {}
        }
        let until = now.saturating_add(self.durations.for_kind(kind));
        self.until.insert(kind, until);
        until
    }

    /// Apply everything a power-up does when eaten
    pub fn apply_power_up<R: Rng>(
        &mut self,
        power_up: PowerUp,
        now: u64,
        grid: Grid,
        rng: &mut R,
    ) -> Activation {
        let Some(kind) = power_up.effect() else {
            return if power_up == PowerUp::Laser {
                self.laser_charged = true;
                Activation::LaserCharged
            } else {
                Activation::Bonus(GOLD_RUSH_BONUS)
            };
        };
        let until_ms = self.activate(kind, now);
        if power_up == PowerUp::Wormhole {
            let portals = Portals {
                a: grid.random_cell(rng),
                b: grid.random_cell(rng),
            };
            log::debug!("Portals opened at {:?} <-> {:?}", portals.a, portals.b);
            self.portals = Some(portals);
        }
        Activation::Timed { kind, until_ms }
    }

    /// Drop every effect, charge and portal
    pub fn clear(&mut self) {
        self.until.clear();
        self.shield_charge = 0;
        self.laser_charged = false;
        self.turret_cooldown = 0;
        self.portals = None;
    }

    pub fn is_active(&self, kind: EffectKind, now: u64) -> bool {
        self.until.get(&kind).is_some_and(|&until| now < until)
    }

    pub fn expiry(&self, kind: EffectKind) -> Option<u64> {
        self.until.get(&kind).copied()
    }

    /// Factor applied to the step interval; all speed effects compose
    pub fn speed_multiplier(&self, now: u64) -> f64 {
        let mut mult = 1.0;
        if self.is_active(EffectKind::SpeedBoost, now) {
            mult *= INFERNO_SPEED;
        }
        if self.is_active(EffectKind::Sprint, now) {
            mult *= SUPERSONIC_SPEED;
        }
        if self.is_active(EffectKind::Slow, now) {
            mult *= ICE_SPEED;
        }
        mult
    }

    pub fn is_ghost(&self, now: u64) -> bool {
        self.is_active(EffectKind::Ghost, now)
    }

    pub fn controls_inverted(&self, now: u64) -> bool {
        self.is_active(EffectKind::InvertControls, now)
    }

    /// Sprint window, or a shield that still holds its charge
    pub fn is_invulnerable(&self, now: u64) -> bool {
        self.is_active(EffectKind::Sprint, now) || self.shield_ready(now)
    }

    pub fn shield_ready(&self, now: u64) -> bool {
        self.shield_charge > 0 && self.is_active(EffectKind::Shield, now)
    }

    pub fn shield_charge(&self) -> u8 {
        self.shield_charge
    }

    /// Spend the shield on one hit; returns whether it absorbed it
    pub fn consume_shield(&mut self, now: u64) -> bool {
        if self.shield_ready(now) {
            self.shield_charge = 0;
            true
        } else {
            false
        }
    }

    pub fn score_multiplier(&self, now: u64) -> u64 {
        if self.is_active(EffectKind::ScoreMultiplier, now) {
            SCORE_MULTIPLIER
        } else {
            1
        }
    }

    pub fn laser_charged(&self) -> bool {
        self.laser_charged
    }

    pub fn charge_laser(&mut self) {
        self.laser_charged = true;
    }

    /// Spend the laser; returns whether a shot was available
    pub fn discharge_laser(&mut self) -> bool {
        std::mem::replace(&mut self.laser_charged, false)
    }

    /// Portals, while the teleport effect runs
    pub fn portals(&self, now: u64) -> Option<Portals> {
        if self.is_active(EffectKind::Teleport, now) {
            self.portals
        } else {
            None
        }
    }

    /// Effects still running, in a stable order
    pub fn active(&self, now: u64) -> Vec<ActiveEffect> {
        self.until
            .iter()
            .filter(|&(_, &until)| now < until)
            .map(|(&kind, &until)| ActiveEffect {
                kind,
                remaining_ms: until - now,
            })
            .collect()
    }

    /// Continuous field effects: push/pull food, turret, portals
    pub fn on_tick(&mut self, now: u64, head: Coord, food: Coord, grid: Grid) -> FieldOutcome {
        let mut out = FieldOutcome {
            food,
            head,
            auto_consume: false,
            teleported: false,
        };

        if self.is_active(EffectKind::Repulsion, now) {
            let dx = out.food.x - head.x;
            let dy = out.food.y - head.y;
            let dist = dx.abs() + dy.abs();
            if dist > 0 && dist <= REPULSOR_RADIUS {
                let pushed = if dx.abs() >= dy.abs() {
                    Coord::new(out.food.x + dx.signum(), out.food.y)
                } else {
                    Coord::new(out.food.x, out.food.y + dy.signum())
                };
                out.food = grid.clamp(pushed);
            }
        }

        if self.is_active(EffectKind::Attraction, now) {
            let dx = head.x - out.food.x;
            let dy = head.y - out.food.y;
            let dist = dx.abs() + dy.abs();
            if dist > 1 && dist <= MAGNET_RADIUS {
                let pulled = Coord::new(out.food.x + dx.signum(), out.food.y + dy.signum());
                out.food = grid.clamp(pulled);
            }
        }

        if self.is_active(EffectKind::AutoConsume, now) {
            if self.turret_cooldown == 0 {
                if head.x == out.food.x || head.y == out.food.y {
                    out.auto_consume = true;
                    self.turret_cooldown = TURRET_COOLDOWN_TICKS;
                }
            } else {
                self.turret_cooldown -= 1;
            }
        }

        if let Some(exit) = self.portals(now).and_then(|p| p.exit_for(head)) {
            out.head = exit;
            out.teleported = true;
        }

        out
    }
}
