//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed-rate timers only (driven by `Session::advance`)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ammo;
pub mod collision;
pub mod difficulty;
pub mod motion;
pub mod scheduler;
pub mod session;
pub mod spawn;
pub mod state;

pub use ammo::FireOutcome;
pub use collision::{CollisionReport, reached_player, within_radius};
pub use scheduler::{Scheduler, Timer, TimerKind};
pub use session::Session;
pub use state::{
    Bullet, Difficulty, Enemy, EnemyTier, EntityStore, GameEvent, Player, RunStats, SessionPhase,
};
