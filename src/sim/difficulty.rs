//! Difficulty ratchet
//!
//! Each difficulty tick raises the level and the live-enemy cap and shortens
//! the spawn interval down to its floor. Nothing here ever eases off.

use super::state::{Difficulty, GameEvent};
use crate::settings::ArenaConfig;

/// Apply one difficulty step; returns the new level
pub fn ratchet(
    difficulty: &mut Difficulty,
    config: &ArenaConfig,
    events: &mut Vec<GameEvent>,
) -> u32 {
    difficulty.level += 1;
    difficulty.max_live_enemies = difficulty
        .max_live_enemies
        .saturating_add(config.max_enemies_step);
    difficulty.spawn_interval_ms = difficulty
        .spawn_interval_ms
        .saturating_sub(config.spawn_interval_step_ms)
        .max(config.min_spawn_interval_ms);

    log::info!(
        "Difficulty {}: spawn every {}ms, up to {} enemies",
        difficulty.level,
        difficulty.spawn_interval_ms,
        difficulty.max_live_enemies
    );
    events.push(GameEvent::DifficultyIncrease {
        level: difficulty.level,
    });
    difficulty.level
}
