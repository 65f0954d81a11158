//! Arena configuration and balance
//!
//! Every tunable of the simulation lives here. Defaults are the reference
//! balance from `crate::consts`; a JSON file may override any subset.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a configuration is rejected
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::Error),
    /// Config text is not valid JSON for `ArenaConfig`
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
            ConfigError::Invalid { field, reason } => write!(f, "invalid `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Seed for the spawn RNG (same seed + same inputs = same run)
    pub seed: u64,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Explicit spawn ring radius; derived from the arena size when unset
    pub spawn_radius: Option<f32>,
    pub player_hit_radius: f32,
    pub max_health: u32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_base_speed: f32,
    pub spawn_grace_ticks: u32,

    // === Bullets & ammo ===
    pub bullet_speed: f32,
    pub bullet_range_factor: f32,
    pub max_ammo: u32,
    pub reload_duration_ms: u64,
    pub reload_step_ms: u64,
    pub ammo_regen_interval_ms: u64,

    // === Timer cadences ===
    pub enemy_move_interval_ms: u64,
    pub bullet_move_interval_ms: u64,

    // === Difficulty ratchet ===
    pub initial_spawn_interval_ms: u64,
    pub min_spawn_interval_ms: u64,
    pub spawn_interval_step_ms: u64,
    pub difficulty_interval_ms: u64,
    pub initial_max_enemies: u32,
    pub max_enemies_step: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 0,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            spawn_radius: None,
            player_hit_radius: PLAYER_HIT_RADIUS,
            max_health: MAX_HEALTH,

            enemy_size: ENEMY_SIZE,
            enemy_base_speed: ENEMY_BASE_SPEED,
            spawn_grace_ticks: SPAWN_GRACE_TICKS,

            bullet_speed: BULLET_SPEED,
            bullet_range_factor: BULLET_RANGE_FACTOR,
            max_ammo: MAX_AMMO,
            reload_duration_ms: RELOAD_DURATION_MS,
            reload_step_ms: RELOAD_STEP_MS,
            ammo_regen_interval_ms: AMMO_REGEN_INTERVAL_MS,

            enemy_move_interval_ms: ENEMY_MOVE_INTERVAL_MS,
            bullet_move_interval_ms: BULLET_MOVE_INTERVAL_MS,

            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_interval_step_ms: SPAWN_INTERVAL_STEP_MS,
            difficulty_interval_ms: DIFFICULTY_INTERVAL_MS,
            initial_max_enemies: INITIAL_MAX_ENEMIES,
            max_enemies_step: MAX_ENEMIES_STEP,
        }
    }
}

impl ArenaConfig {
    /// Default balance with a specific RNG seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Radius of the ring enemies spawn on
    pub fn spawn_radius(&self) -> f32 {
        self.spawn_radius
            .unwrap_or_else(|| self.arena_width.min(self.arena_height) * SPAWN_RADIUS_FACTOR)
    }

    /// Bullets travelling further than this are removed
    pub fn bullet_max_range(&self) -> f32 {
        self.spawn_radius() * self.bullet_range_factor
    }

    /// Bullet-to-enemy collision radius
    pub fn hitbox_radius(&self) -> f32 {
        self.enemy_size * HITBOX_FACTOR
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty JSON representation
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and validate a config file
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Load a config file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::read(path) {
            Ok(config) => {
                log::info!("Loaded arena config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default arena config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }
        fn nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
            if value > 0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero",
                })
            }
        }

        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        if let Some(radius) = self.spawn_radius {
            positive("spawn_radius", radius)?;
        }
        positive("player_hit_radius", self.player_hit_radius)?;
        positive("enemy_size", self.enemy_size)?;
        positive("enemy_base_speed", self.enemy_base_speed)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("bullet_range_factor", self.bullet_range_factor)?;

        nonzero("max_health", self.max_health as u64)?;
        nonzero("max_ammo", self.max_ammo as u64)?;
        nonzero("reload_duration_ms", self.reload_duration_ms)?;
        nonzero("reload_step_ms", self.reload_step_ms)?;
        nonzero("ammo_regen_interval_ms", self.ammo_regen_interval_ms)?;
        nonzero("enemy_move_interval_ms", self.enemy_move_interval_ms)?;
        nonzero("bullet_move_interval_ms", self.bullet_move_interval_ms)?;
        nonzero("min_spawn_interval_ms", self.min_spawn_interval_ms)?;
        nonzero("difficulty_interval_ms", self.difficulty_interval_ms)?;

        if self.min_spawn_interval_ms > self.initial_spawn_interval_ms {
            return Err(ConfigError::Invalid {
                field: "min_spawn_interval_ms",
                reason: "must not exceed initial_spawn_interval_ms",
            });
        }

        Ok(())
    }
}
