//! Collision detection and resolution
//!
//! Everything is a circle test against either the arena center (enemy reaches
//! the player) or another entity (bullet hits enemy). Resolution runs once per
//! bullet tick, after bullets have moved.
//!
//! Tie-break: a bullet overlapping several enemies hits the first one in store
//! order (ascending id, so the oldest spawn). This is iteration-order dependent
//! by construction; replays stay deterministic because store order is.

use glam::Vec2;

use super::state::{EntityStore, GameEvent};
use crate::settings::ArenaConfig;

/// Totals from one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Enemies that reached the player
    pub touches: u32,
    /// Damage applied to the player (before flooring at zero)
    pub damage: u32,
    /// Bullets that hit something
    pub hits: u32,
    /// Enemies destroyed by bullets
    pub kills: u32,
    /// Score credited this pass
    pub points: u64,
}

/// Check if two points are closer than `radius`
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// Check if an enemy has reached the player at the arena center
#[inline]
pub fn reached_player(enemy_pos: Vec2, player_hit_radius: f32) -> bool {
    within_radius(enemy_pos, Vec2::ZERO, player_hit_radius)
}

/// Resolve enemy-player touches, then bullet-enemy hits
pub fn resolve(
    store: &mut EntityStore,
    config: &ArenaConfig,
    events: &mut Vec<GameEvent>,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    resolve_touches(store, config, events, &mut report);
    resolve_hits(store, config, events, &mut report);
    report
}

/// Enemies inside the player radius damage the player and vanish unscored
fn resolve_touches(
    store: &mut EntityStore,
    config: &ArenaConfig,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    let player = &mut store.player;
    store.enemies.retain(|enemy| {
        if enemy.is_spawning() || !reached_player(enemy.pos, config.player_hit_radius) {
            return true;
        }
        let damage = enemy.tier.touch_damage();
        player.health = player.health.saturating_sub(damage);
        report.touches += 1;
        report.damage += damage;
        log::debug!(
            "Enemy {} ({:?}) reached player: -{} -> {}",
            enemy.id,
            enemy.tier,
            damage,
            player.health
        );
        events.push(GameEvent::PlayerHit {
            damage,
            health: player.health,
        });
        false
    });
}

/// Each bullet hits at most one enemy and is consumed by it
fn resolve_hits(
    store: &mut EntityStore,
    config: &ArenaConfig,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    let hitbox = config.hitbox_radius();
    let mut spent_bullets: Vec<u32> = Vec::new();

    for bullet in &store.bullets {
        // Dead enemies stay in the vec (hp 0) until the pass ends; skip them
        let target = store.enemies.iter_mut().find(|enemy| {
            enemy.hit_points > 0
                && !enemy.is_spawning()
                && within_radius(bullet.pos, enemy.pos, hitbox)
        });
        let Some(enemy) = target else { continue };

        spent_bullets.push(bullet.id);
        report.hits += 1;
        enemy.hit_points -= 1;

        if enemy.hit_points == 0 {
            let points = enemy.tier.score_value();
            store.score += points;
            report.kills += 1;
            report.points += points;
            log::debug!("Enemy {} ({:?}) destroyed, +{}", enemy.id, enemy.tier, points);
            events.push(GameEvent::EnemyKilled {
                id: enemy.id,
                tier: enemy.tier,
                points,
            });
        } else {
            events.push(GameEvent::EnemyHit {
                id: enemy.id,
                tier: enemy.tier,
            });
        }
    }

    if !spent_bullets.is_empty() {
        store.bullets.retain(|b| !spent_bullets.contains(&b.id));
        store.enemies.retain(|e| e.hit_points > 0);
    }
}
