//! Arena Shooter - a circular arena defence game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, ammo, session state)
//! - `feedback`: Fire-and-forget event port for haptics/audio/presentation
//! - `highscores`: Session completion sink and local score bookkeeping
//! - `settings`: Data-driven game balance and timer cadences

pub mod feedback;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use feedback::{FeedbackPort, HapticLog, NullFeedback};
pub use highscores::{HighScores, NullSink, PlayerStats, SessionSink};
pub use settings::{ArenaConfig, ConfigError};
pub use sim::{GameEvent, Session, SessionPhase};

use glam::Vec2;

/// Game configuration constants (reference balance)
pub mod consts {
    /// Reference arena (portrait phone screen, logical points)
    pub const ARENA_WIDTH: f32 = 390.0;
    pub const ARENA_HEIGHT: f32 = 844.0;
    /// Spawn ring radius as a fraction of the arena's shorter side
    pub const SPAWN_RADIUS_FACTOR: f32 = 0.4;

    /// Enemies closer than this to the center damage the player
    pub const PLAYER_HIT_RADIUS: f32 = 50.0;
    pub const MAX_HEALTH: u32 = 100;

    /// Enemy visual size; the hitbox radius is 80% of it
    pub const ENEMY_SIZE: f32 = 30.0;
    pub const HITBOX_FACTOR: f32 = 0.8;
    /// Distance per enemy-move tick before the tier multiplier
    pub const ENEMY_BASE_SPEED: f32 = 2.0;
    /// Enemy-move ticks an enemy sits out after spawning
    pub const SPAWN_GRACE_TICKS: u32 = 1;

    /// Distance per bullet-move tick
    pub const BULLET_SPEED: f32 = 15.0;
    /// Bullets expire past this multiple of the spawn radius
    pub const BULLET_RANGE_FACTOR: f32 = 1.5;

    pub const MAX_AMMO: u32 = 30;
    pub const RELOAD_DURATION_MS: u64 = 1000;
    pub const RELOAD_STEP_MS: u64 = 10;
    pub const AMMO_REGEN_INTERVAL_MS: u64 = 5000;

    /// Timer cadences
    pub const ENEMY_MOVE_INTERVAL_MS: u64 = 50;
    pub const BULLET_MOVE_INTERVAL_MS: u64 = 20;

    /// Spawn/difficulty ratchet
    pub const INITIAL_SPAWN_INTERVAL_MS: u64 = 1000;
    pub const MIN_SPAWN_INTERVAL_MS: u64 = 300;
    pub const SPAWN_INTERVAL_STEP_MS: u64 = 100;
    pub const DIFFICULTY_INTERVAL_MS: u64 = 15_000;
    pub const INITIAL_MAX_ENEMIES: u32 = 15;
    pub const MAX_ENEMIES_STEP: u32 = 5;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Unit vector along `dir`, or +X when `dir` is zero-length or not finite
#[inline]
pub fn direction_or_default(dir: Vec2) -> Vec2 {
    if !dir.is_finite() || dir.length_squared() < 1e-6 {
        return Vec2::X;
    }
    dir.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_roundtrip_angle() {
        let p = polar_to_cartesian(100.0, 1.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 100.0).abs() < 1e-3);
        assert!((theta - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_direction_degenerate_inputs() {
        assert_eq!(direction_or_default(Vec2::ZERO), Vec2::X);
        assert_eq!(direction_or_default(Vec2::new(f32::NAN, 1.0)), Vec2::X);
        assert_eq!(direction_or_default(Vec2::new(f32::INFINITY, 0.0)), Vec2::X);

        let d = direction_or_default(Vec2::new(0.0, -7.0));
        assert!((d - Vec2::NEG_Y).length() < 1e-6);
    }
}
