//! End-to-end gameplay scenarios driven through `Session`

use glam::Vec2;

use arena_shooter::sim::{EnemyTier, FireOutcome, GameEvent, Session, SessionPhase, TimerKind};
use arena_shooter::{ArenaConfig, HighScores, NullFeedback, NullSink};

/// Seeded config with the spawner capped at zero, so only placed enemies exist
/// until the first difficulty step
fn quiet(seed: u64) -> ArenaConfig {
    ArenaConfig {
        initial_max_enemies: 0,
        ..ArenaConfig::with_seed(seed)
    }
}

fn recording(config: ArenaConfig) -> Session<Vec<u64>, Vec<GameEvent>> {
    let mut session = Session::with_ports(config, Vec::new(), Vec::new());
    session.start_game();
    session
}

fn kills(events: &[GameEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyKilled { .. }))
        .count()
}

#[test]
fn test_basic_kill() {
    let mut session = recording(quiet(1));
    let id = session.insert_enemy(EnemyTier::Weak, Vec2::new(100.0, 0.0));
    assert!(id.is_some());

    assert!(matches!(session.fire(1.0, 0.0), Some(FireOutcome::Fired { .. })));
    session.advance(200);

    assert!(session.enemies().is_empty());
    assert!(session.bullets().is_empty());
    assert_eq!(session.score(), 10);
    assert_eq!(kills(session.feedback()), 1);
    assert_eq!(session.stats().kills, 1);
    assert_eq!(session.stats().shots_fired, 1);
}

#[test]
fn test_basic_kill_on_the_left() {
    let mut session = recording(quiet(2));
    session.insert_enemy(EnemyTier::Weak, Vec2::new(-100.0, 0.0));

    session.fire(-1.0, 0.0);
    session.advance(200);

    assert!(session.enemies().is_empty());
    assert_eq!(session.score(), 10);
}

#[test]
fn test_multi_hit_tank() {
    let mut session = recording(quiet(3));
    let id = session
        .insert_enemy(EnemyTier::Strong, Vec2::new(150.0, 0.0))
        .unwrap();

    for expected_hp in [2u8, 1] {
        session.fire(1.0, 0.0);
        session.advance(300);
        let enemy = session.store().enemy(id).unwrap();
        assert_eq!(enemy.hit_points, expected_hp);
        assert_eq!(session.score(), 0);
    }

    session.fire(1.0, 0.0);
    session.advance(300);
    assert!(session.store().enemy(id).is_none());
    assert_eq!(session.score(), 30);

    let events = session.feedback();
    let hits = events
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyHit { .. }))
        .count();
    assert_eq!(hits, 2);
    assert_eq!(kills(events), 1);
}

#[test]
fn test_overlapping_bullets_credit_one_kill() {
    let mut session = recording(quiet(4));
    session.insert_enemy(EnemyTier::Weak, Vec2::new(0.0, 120.0));

    // Three bullets in the same spot reach the enemy on the same tick
    for _ in 0..3 {
        session.fire(0.0, 1.0);
    }
    session.advance(200);

    assert_eq!(session.score(), 10);
    assert_eq!(kills(session.feedback()), 1);
    // The two spare bullets fly on
    assert_eq!(session.bullets().len(), 2);
}

#[test]
fn test_reload_gate() {
    let mut session = recording(quiet(5));
    session.set_ammo(0);

    assert_eq!(session.fire(1.0, 0.0), Some(FireOutcome::ReloadStarted));
    assert!(session.bullets().is_empty());
    assert!(session.player().reloading);
    assert_eq!(session.player().displayed_ammo(), 0);

    assert_eq!(session.fire(1.0, 0.0), Some(FireOutcome::Blocked));
    assert!(session.bullets().is_empty());

    session.advance(990);
    assert!(session.player().reloading);
    assert_eq!(session.player().reload_progress, 99);

    session.advance(10);
    assert!(!session.player().reloading);
    assert_eq!(session.player().ammo, 30);
    assert!(!session.scheduler().is_running(TimerKind::Reload));

    assert!(matches!(session.fire(1.0, 0.0), Some(FireOutcome::Fired { .. })));
    assert_eq!(session.bullets().len(), 1);
    assert_eq!(session.player().ammo, 29);

    let events = session.feedback();
    assert_eq!(events.iter().filter(|e| **e == GameEvent::ReloadStart).count(), 1);
    assert_eq!(events.iter().filter(|e| **e == GameEvent::ReloadComplete).count(), 1);
}

#[test]
fn test_emptying_the_clip_then_reloading() {
    let mut session = recording(quiet(6));
    for _ in 0..30 {
        assert!(matches!(session.fire(0.0, -1.0), Some(FireOutcome::Fired { .. })));
    }
    assert_eq!(session.player().ammo, 0);
    assert!(!session.player().reloading);

    // The 31st tap starts the reload instead of firing
    assert_eq!(session.fire(0.0, -1.0), Some(FireOutcome::ReloadStarted));
    session.advance(1000);
    assert_eq!(session.player().ammo, 30);
}

#[test]
fn test_pause_freezes_world() {
    let mut session = Session::with_ports(ArenaConfig::with_seed(7), NullSink, Vec::new());
    session.start_game();
    session.advance(2_500);
    session.fire(0.0, 1.0);
    session.advance(40);
    assert!(!session.enemies().is_empty());
    assert!(!session.bullets().is_empty());

    session.pause();
    let frozen = serde_json::to_string(session.store()).unwrap();
    let clock = session.elapsed_ms();
    let seen = session.feedback().len();

    session.advance(10_000);
    session.resume();

    assert_eq!(serde_json::to_string(session.store()).unwrap(), frozen);
    assert_eq!(session.elapsed_ms(), clock);
    assert_eq!(session.feedback().len(), seen);

    // And it picks up again once resumed
    session.advance(60);
    assert_ne!(serde_json::to_string(session.store()).unwrap(), frozen);
}

#[test]
fn test_range_expiry() {
    let mut session = recording(quiet(8));
    session.fire(1.0, 0.0);

    // 234 range at 15 per tick: gone on tick 16
    session.advance(15 * 20);
    assert_eq!(session.bullets().len(), 1);
    assert_eq!(session.bullets()[0].traveled, 225.0);

    session.advance(20);
    assert!(session.bullets().is_empty());
    assert_eq!(session.stats().bullets_expired, 1);
}

#[test]
fn test_enemy_touch_hurts_without_score() {
    let mut session = recording(quiet(9));
    session.insert_enemy(EnemyTier::Weak, Vec2::new(60.0, 0.0));

    session.advance(250);
    assert!(session.enemies().is_empty());
    assert_eq!(session.player().health, 90);
    assert_eq!(session.score(), 0);
    assert!(
        session
            .feedback()
            .contains(&GameEvent::PlayerHit { damage: 10, health: 90 })
    );
}

#[test]
fn test_simultaneous_lethal_touches_floor_health() {
    let mut session = recording(quiet(10));
    for i in 0..5 {
        session.insert_enemy(EnemyTier::Strong, Vec2::new(0.0, -10.0 - i as f32));
    }
    session.advance(20);

    assert_eq!(session.player().health, 0);
    assert_eq!(session.phase(), SessionPhase::GameOver);
    assert_eq!(session.sink(), &vec![0]);
}

#[test]
fn test_queued_tap_after_game_over_is_ignored() {
    let mut session = recording(quiet(11));
    for _ in 0..4 {
        session.insert_enemy(EnemyTier::Strong, Vec2::new(20.0, 0.0));
    }
    session.advance(20);
    assert_eq!(session.phase(), SessionPhase::GameOver);

    let before = session.feedback().len();
    assert_eq!(session.fire(1.0, 0.0), None);
    assert!(session.insert_enemy(EnemyTier::Weak, Vec2::ZERO).is_none());
    assert!(session.bullets().is_empty());
    assert_eq!(session.feedback().len(), before);
}

#[test]
fn test_zero_length_tap_fires_along_x() {
    let mut session = recording(quiet(12));
    session.fire(0.0, 0.0);
    session.fire(f32::NAN, 1.0);
    session.advance(20);

    for bullet in session.bullets() {
        assert_eq!(bullet.dir, Vec2::X);
        assert_eq!(bullet.pos, Vec2::new(15.0, 0.0));
    }
    assert_eq!(session.bullets().len(), 2);
}

#[test]
fn test_difficulty_ratchet_is_monotonic() {
    // Crawling enemies never reach the player, so the run outlasts the floor
    let config = ArenaConfig {
        enemy_base_speed: 0.001,
        ..ArenaConfig::with_seed(13)
    };
    let mut session = Session::new(config);
    session.start_game();

    let mut last = *session.difficulty();
    for _ in 0..10 {
        session.advance(15_000);
        let now = *session.difficulty();
        assert_eq!(now.level, last.level + 1);
        assert!(now.max_live_enemies >= last.max_live_enemies);
        assert!(now.spawn_interval_ms <= last.spawn_interval_ms);
        assert!(now.spawn_interval_ms >= 300);
        assert!(session.enemies().len() <= now.max_live_enemies as usize);
        last = now;
    }
    assert_eq!(last.level, 11);
    assert_eq!(last.spawn_interval_ms, 300);
    assert_eq!(last.max_live_enemies, 65);
    assert_eq!(session.phase(), SessionPhase::Playing);
}

#[test]
fn test_high_score_sink_across_games() {
    let mut session = Session::with_ports(quiet(14), HighScores::new(), NullFeedback);
    for crowd in [1usize, 3, 2] {
        session.start_game();
        // One bullet, so only the first of the column dies
        for k in 0..crowd {
            let y = 80.0 + k as f32;
            session.insert_enemy(EnemyTier::Weak, Vec2::new(0.0, y));
        }
        session.fire(0.0, 1.0);
        session.advance(200);
        // Finish the game with point-blank touches
        for _ in 0..4 {
            session.insert_enemy(EnemyTier::Strong, Vec2::new(5.0, 0.0));
        }
        session.advance(20);
        assert_eq!(session.phase(), SessionPhase::GameOver);
    }

    let scores = session.sink();
    assert_eq!(scores.stats.total_games, 3);
    assert_eq!(scores.stats.high_score, 10);
    assert_eq!(scores.stats.last_score, 10);
    assert_eq!(scores.entries.len(), 3);
}


#[test]
fn test_ended_games_count_toward_high_scores() {
    let mut session = Session::with_ports(quiet(15), HighScores::new(), NullFeedback);
    for _ in 0..3 {
        session.start_game();
        session.insert_enemy(EnemyTier::Weak, Vec2::new(90.0, 0.0));
        session.fire(1.0, 0.0);
        // Time limit reached while still alive
        session.advance(1_000);
        assert_eq!(session.phase(), SessionPhase::Playing);
        session.end_game();
        assert_eq!(session.phase(), SessionPhase::GameOver);
    }

    let scores = session.sink();
    assert_eq!(scores.stats.total_games, 3);
    assert_eq!(scores.stats.last_score, 10);
    assert_eq!(scores.entries.len(), 3);
}

#[test]
fn test_restart_does_not_leak_previous_game_events() {
    let mut session = recording(quiet(16));
    for _ in 0..3 {
        session.fire(0.0, 1.0);
    }
    session.advance(100);
    session.start_game();
    assert!(session.drain_events().is_empty());

    session.fire(1.0, 0.0);
    assert_eq!(session.drain_events(), vec![GameEvent::Fired]);
    // The feedback port saw everything, across both games
    assert_eq!(
        session
            .feedback()
            .iter()
            .filter(|e| **e == GameEvent::Fired)
            .count(),
        4
    );
}
