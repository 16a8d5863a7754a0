//! Game settings
//!
//! Loaded from a JSON file by the host; every field falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{EffectKind, PowerUp};

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Duration of each timed effect (ms)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDurations {
    pub inferno_ms: u64,
    pub ice_ms: u64,
    pub phase_ms: u64,
    pub black_hole_ms: u64,
    pub supersonic_ms: u64,
    pub shield_ms: u64,
    pub multiplier_ms: u64,
    pub magnet_ms: u64,
    pub repulsor_ms: u64,
    pub turret_ms: u64,
    pub wormhole_ms: u64,
    pub emp_ms: u64,
}

impl Default for EffectDurations {
    fn default() -> Self {
        Self {
            inferno_ms: 5_000,
            ice_ms: 5_000,
            phase_ms: 5_000,
            black_hole_ms: 5_000,
            supersonic_ms: 3_000,
            shield_ms: 10_000,
            multiplier_ms: 10_000,
            magnet_ms: 5_000,
            repulsor_ms: 5_000,
            turret_ms: 5_000,
            wormhole_ms: 10_000,
            emp_ms: 1_000,
        }
    }
}

impl EffectDurations {
    pub fn for_kind(&self, kind: EffectKind) -> u64 {
        match kind {
            EffectKind::SpeedBoost => self.inferno_ms,
            EffectKind::Slow => self.ice_ms,
            EffectKind::Ghost => self.phase_ms,
            EffectKind::InvertControls => self.black_hole_ms,
            EffectKind::Sprint => self.supersonic_ms,
            EffectKind::Shield => self.shield_ms,
            EffectKind::ScoreMultiplier => self.multiplier_ms,
            EffectKind::Attraction => self.magnet_ms,
            EffectKind::Repulsion => self.repulsor_ms,
            EffectKind::AutoConsume => self.turret_ms,
            EffectKind::Teleport => self.wormhole_ms,
            EffectKind::AreaClear => self.emp_ms,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid width in cells
    pub width: i32,
    /// Grid height in cells
    pub height: i32,
    /// Step interval before speed modifiers (ms)
    pub base_tick_ms: u64,
    /// Snake length at session start
    pub initial_length: usize,
    /// Probability that a respawned food is a power-up
    pub power_up_chance: f64,
    /// Power-ups that can spawn, one equal-width bin each
    pub power_up_pool: Vec<PowerUp>,
    /// Deterministic mode: no power-ups, no autonomous food motion
    pub test_mode: bool,
    /// RNG seed; random when absent
    pub seed: Option<u64>,
    /// Opaque Telegram init data forwarded with the score
    pub init_data: Option<String>,
    pub durations: EffectDurations,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_canvas(CANVAS_WIDTH, CANVAS_HEIGHT, CELL_SIZE)
    }
}

impl Settings {
    /// Settings for a canvas of the given pixel size
    pub fn from_canvas(canvas_width: u32, canvas_height: u32, cell_size: u32) -> Self {
        let cell = cell_size.max(1);
        Self {
            width: (canvas_width / cell) as i32,
            height: (canvas_height / cell) as i32,
            base_tick_ms: BASE_TICK_MS,
            initial_length: SNAKE_MIN_LENGTH,
            power_up_chance: POWER_UP_CHANCE,
            power_up_pool: PowerUp::CLASSIC.to_vec(),
            test_mode: false,
            seed: None,
            init_data: None,
            durations: EffectDurations::default(),
        }
    }

    /// Reproducible settings: test mode on and a fixed seed
    pub fn deterministic(seed: u64) -> Self {
        Self {
            test_mode: true,
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn total_cells(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.initial_length < SNAKE_MIN_LENGTH {
            return Err(SettingsError::Invalid(format!(
                "initial_length {} is below the minimum of {}",
                self.initial_length, SNAKE_MIN_LENGTH
            )));
        }
        if self.width < self.initial_length as i32 || self.height < 1 {
            return Err(SettingsError::Invalid(format!(
                "a {}x{} grid cannot hold a snake of length {}",
                self.width, self.height, self.initial_length
            )));
        }
        if self.base_tick_ms == 0 {
            return Err(SettingsError::Invalid("base_tick_ms must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return Err(SettingsError::Invalid(format!(
                "power_up_chance {} is outside [0, 1]",
                self.power_up_chance
            )));
        }
        if self.power_up_pool.is_empty() && self.power_up_chance > 0.0 {
            return Err(SettingsError::Invalid(
                "power_up_pool is empty but power_up_chance is positive".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
