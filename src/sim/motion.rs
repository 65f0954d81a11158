//! Motion integration
//!
//! Enemies and bullets advance on their own cadences with constant-speed
//! kinematics: enemies home on the center, bullets fly straight.

use glam::Vec2;

use super::state::EntityStore;
use crate::settings::ArenaConfig;

/// One enemy-move tick. Enemies still in their spawn grace consume a grace
/// tick instead of moving.
pub fn move_enemies(store: &mut EntityStore, config: &ArenaConfig) {
    for enemy in &mut store.enemies {
        if enemy.is_spawning() {
            enemy.spawn_grace -= 1;
            continue;
        }

        let step = enemy.speed(config.enemy_base_speed);
        let dist = enemy.pos.length();
        if dist <= step {
            // Would overshoot the center
            enemy.pos = Vec2::ZERO;
        } else {
            let to_center = -enemy.pos / dist;
            enemy.pos += to_center * step;
        }
    }
}

/// One bullet-move tick. Returns how many bullets expired by range.
pub fn move_bullets(store: &mut EntityStore, config: &ArenaConfig) -> usize {
    let step = config.bullet_speed;
    let max_range = config.bullet_max_range();

    for bullet in &mut store.bullets {
        bullet.pos += bullet.dir * step;
        bullet.traveled += step;
    }

    let before = store.bullets.len();
    store.bullets.retain(|b| b.traveled <= max_range);
    before - store.bullets.len()
}
