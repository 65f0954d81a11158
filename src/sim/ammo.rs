//! Ammunition and reload cycle
//!
//! The player fires from a clip of `max_ammo` rounds. An empty clip turns the
//! next fire request into a reload; a slow regen timer also reloads a partial
//! clip. Reload progress runs 0 -> 100 in `reload_step_ms` increments and the
//! clip is refilled only once it reaches 100.

use glam::Vec2;

use super::state::{Bullet, EntityStore, GameEvent, Player};
use crate::{cartesian_to_polar, direction_or_default};
use crate::settings::ArenaConfig;

/// What a fire request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A bullet was created
    Fired { bullet_id: u32 },
    /// Clip was empty; a reload started instead
    ReloadStarted,
    /// Reloading; request ignored
    Blocked,
}

/// Handle a fire request toward a raw (unnormalized) direction
pub fn fire(
    store: &mut EntityStore,
    raw_dir: Vec2,
    events: &mut Vec<GameEvent>,
) -> FireOutcome {
    if store.player.reloading {
        log::trace!("Fire ignored: reloading");
        return FireOutcome::Blocked;
    }
    if store.player.ammo == 0 {
        start_reload(&mut store.player, events);
        return FireOutcome::ReloadStarted;
    }

    let dir = direction_or_default(raw_dir);
    store.player.ammo -= 1;
    store.stats.shots_fired += 1;
    store.player.aim_angle = cartesian_to_polar(dir).1;

    let bullet_id = store.next_entity_id();
    store.bullets.push(Bullet::new(bullet_id, dir));
    events.push(GameEvent::Fired);
    FireOutcome::Fired { bullet_id }
}

/// Begin a reload from zero progress. Returns false if one is already running.
pub fn start_reload(player: &mut Player, events: &mut Vec<GameEvent>) -> bool {
    if player.reloading {
        return false;
    }
    player.reloading = true;
    player.reload_progress = 0;
    player.reload_elapsed_ms = 0;
    log::debug!("Reload started with {} rounds left", player.ammo);
    events.push(GameEvent::ReloadStart);
    true
}

/// Advance the running reload by one step. Returns true when it completed.
pub fn reload_step(player: &mut Player, config: &ArenaConfig, events: &mut Vec<GameEvent>) -> bool {
    if !player.reloading {
        return false;
    }

    player.reload_elapsed_ms += config.reload_step_ms;
    if player.reload_elapsed_ms < config.reload_duration_ms {
        // elapsed < duration, so this stays below 100
        player.reload_progress = (player.reload_elapsed_ms * 100 / config.reload_duration_ms) as u8;
        return false;
    }

    player.reload_progress = 100;
    player.reload_elapsed_ms = config.reload_duration_ms;
    player.ammo = config.max_ammo;
    player.reloading = false;
    log::debug!("Reload complete");
    events.push(GameEvent::ReloadComplete);
    true
}

/// Passive regen check: reload a partial clip. Returns true if a reload started.
pub fn regen_tick(player: &mut Player, config: &ArenaConfig, events: &mut Vec<GameEvent>) -> bool {
    if player.reloading || player.ammo >= config.max_ammo {
        return false;
    }
    start_reload(player, events)
}
