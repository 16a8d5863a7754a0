//! Laser shots in flight
//!
//! Scoring is decided when the shot is fired; these only travel for display.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Continuous position in cell units
    pub pos: Vec2,
    /// Cells per step
    pub vel: Vec2,
    pub age: u32,
    pub max_age: u32,
    /// Steps left after passing the food
    overshoot: Option<u32>,
}

impl Projectile {
    pub fn new(origin: Vec2, dir: Vec2) -> Self {
        Self {
            pos: origin,
            vel: dir.normalize_or_zero() * PROJECTILE_SPEED,
            age: 0,
            max_age: PROJECTILE_MAX_AGE,
            overshoot: None,
        }
    }

    /// Whether the shot has reached the target
    pub fn has_reached(&self) -> bool {
        self.overshoot.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projectiles {
    shots: Vec<Projectile>,
}

impl Projectiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire a shot from `origin`; a zero direction fires nothing
    pub fn spawn(&mut self, origin: Vec2, dir: Vec2) {
        if dir == Vec2::ZERO {
            return;
        }
        self.shots.push(Projectile::new(origin, dir));
    }

    /// Move every shot one step and drop the spent ones
    pub fn advance(&mut self, target: Vec2, grid: Grid) {
        self.shots.retain_mut(|shot| {
            shot.pos += shot.vel;
            shot.age += 1;
            if shot.age > shot.max_age || !grid.contains_point(shot.pos) {
                return false;
            }
            match shot.overshoot {
                Some(0) => return false,
                Some(left) => shot.overshoot = Some(left - 1),
                None if shot.pos.distance(target) <= PROJECTILE_HIT_TOLERANCE => {
                    shot.overshoot = Some(PROJECTILE_OVERSHOOT_TICKS);
                }
                None => {}
            }
            true
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.shots.iter()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.shots.iter().map(|s| s.pos).collect()
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn clear(&mut self) {
        self.shots.clear();
    }
}
