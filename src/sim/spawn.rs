//! Enemy spawning
//!
//! One call per spawn tick. Enemies appear on the spawn ring at a uniformly
//! random angle, respecting the current live-enemy cap.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyTier, EntityStore, GameEvent};
use crate::polar_to_cartesian;
use crate::settings::ArenaConfig;

/// Run one spawn tick. Returns the new enemy's ID, or `None` when capped.
pub fn spawn_tick<R: Rng>(
    store: &mut EntityStore,
    config: &ArenaConfig,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Option<u32> {
    if store.live_enemy_count() >= store.difficulty.max_live_enemies as usize {
        log::trace!(
            "Spawn skipped: {} live enemies at cap {}",
            store.live_enemy_count(),
            store.difficulty.max_live_enemies
        );
        return None;
    }

    let tier = EnemyTier::from_roll(rng.random::<f32>());
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let pos = polar_to_cartesian(config.spawn_radius(), angle);

    let id = place_enemy(store, tier, pos, config.spawn_grace_ticks);
    log::debug!("Spawned {:?} enemy {} at angle {:.2}", tier, id, angle);
    events.push(GameEvent::EnemySpawned { id, tier });
    Some(id)
}

/// Insert an enemy at an explicit position
pub fn place_enemy(store: &mut EntityStore, tier: EnemyTier, pos: Vec2, grace: u32) -> u32 {
    let id = store.next_entity_id();
    store.enemies.push(Enemy::new(id, tier, pos, grace));
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_on_ring_with_grace() {
        let config = ArenaConfig::default();
        let mut store = EntityStore::new(&config);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();

        let id = spawn_tick(&mut store, &config, &mut rng, &mut events).unwrap();
        let enemy = store.enemy(id).unwrap();
        assert!((enemy.pos.length() - config.spawn_radius()).abs() < 1e-3);
        assert_eq!(enemy.spawn_grace, config.spawn_grace_ticks);
        assert_eq!(enemy.hit_points, enemy.tier.hit_points());
        assert_eq!(events, vec![GameEvent::EnemySpawned { id, tier: enemy.tier }]);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let config = ArenaConfig {
            initial_max_enemies: 3,
            ..ArenaConfig::default()
        };
        let mut store = EntityStore::new(&config);
        let mut rng = Pcg32::seed_from_u64(2);
        let mut events = Vec::new();

        for _ in 0..10 {
            spawn_tick(&mut store, &config, &mut rng, &mut events);
        }
        assert_eq!(store.live_enemy_count(), 3);
        assert_eq!(events.len(), 3);

        store.difficulty.max_live_enemies = 4;
        assert!(spawn_tick(&mut store, &config, &mut rng, &mut events).is_some());
        assert!(spawn_tick(&mut store, &config, &mut rng, &mut events).is_none());
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let config = ArenaConfig::default();
        let run = |seed| {
            let mut store = EntityStore::new(&config);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut events = Vec::new();
            for _ in 0..8 {
                spawn_tick(&mut store, &config, &mut rng, &mut events);
            }
            store
                .enemies
                .iter()
                .map(|e| (e.tier, e.pos.x.to_bits(), e.pos.y.to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
        assert_ne!(run(9), run(10));
    }

    #[test]
    fn test_tier_mix_roughly_matches_roll_bands() {
        let config = ArenaConfig {
            initial_max_enemies: 3000,
            ..ArenaConfig::default()
        };
        let mut store = EntityStore::new(&config);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut events = Vec::new();
        for _ in 0..3000 {
            spawn_tick(&mut store, &config, &mut rng, &mut events);
        }
        let share = |tier| {
            store.enemies.iter().filter(|e| e.tier == tier).count() as f32 / 3000.0
        };
        assert!((share(EnemyTier::Weak) - 0.4).abs() < 0.05);
        assert!((share(EnemyTier::Medium) - 0.3).abs() < 0.05);
        assert!((share(EnemyTier::Strong) - 0.3).abs() < 0.05);
    }
}
