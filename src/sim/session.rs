//! Session state machine
//!
//! `Session` owns the entity store, the timer scheduler, the RNG and the two
//! outbound ports. It is the only thing allowed to mutate game state:
//!
//! ```text
//! Ready --start_game--> Playing <--toggle_pause--> Paused
//!                          |
//!                     health hits 0
//!                          v
//!                      GameOver --start_game--> Playing
//! ```
//!
//! Requests that arrive in the wrong phase (a tap after game over, pausing
//! while not playing) are silently ignored.
//!
//! Events are forwarded to the feedback port as they happen and also kept for
//! `drain_events`, up to `MAX_PENDING_EVENTS`; the oldest are dropped past
//! that. A new game starts with an empty buffer.
//!
//! Reload across pause: the reload timer stops with the others and resumes
//! from the same progress. Starting or resetting a game cancels any reload.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::ammo::{self, FireOutcome};
use super::collision::{self, CollisionReport};
use super::difficulty;
use super::motion;
use super::scheduler::{Scheduler, TimerKind};
use super::spawn;
use super::state::{
    Bullet, Difficulty, Enemy, EnemyTier, EntityStore, GameEvent, Player, RunStats, SessionPhase,
};
use crate::feedback::{FeedbackPort, NullFeedback};
use crate::highscores::{NullSink, SessionSink};
use crate::settings::ArenaConfig;

/// Undrained events kept for `drain_events`
pub const MAX_PENDING_EVENTS: usize = 1024;

/// One play session with its outbound ports
pub struct Session<S: SessionSink = NullSink, F: FeedbackPort = NullFeedback> {
    config: ArenaConfig,
    phase: SessionPhase,
    store: EntityStore,
    scheduler: Scheduler,
    rng: Pcg32,
    sink: S,
    feedback: F,
    /// Events not yet drained by the presentation layer
    events: Vec<GameEvent>,
}

impl Session {
    /// Session with no-op ports
    pub fn new(config: ArenaConfig) -> Self {
        Self::with_ports(config, NullSink, NullFeedback)
    }
}

impl<S: SessionSink, F: FeedbackPort> Session<S, F> {
    /// Session reporting to `sink` and emitting to `feedback`. An invalid
    /// config is replaced by the defaults (keeping its seed).
    pub fn with_ports(config: ArenaConfig, sink: S, feedback: F) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Rejected arena config ({}); using defaults", e);
                ArenaConfig::with_seed(config.seed)
            }
        };

        Self {
            phase: SessionPhase::Ready,
            store: EntityStore::new(&config),
            scheduler: Scheduler::new(&config),
            rng: Pcg32::seed_from_u64(config.seed),
            sink,
            feedback,
            events: Vec::new(),
            config,
        }
    }

    // --- Phase transitions ---

    /// Start a fresh game from any phase
    pub fn start_game(&mut self) {
        self.store = EntityStore::new(&self.config);
        self.scheduler = Scheduler::new(&self.config);
        self.events.clear();
        self.phase = SessionPhase::Playing;
        self.start_timers();
        log::info!("Game started (seed {})", self.config.seed);
    }

    /// Back to `Ready` without reporting a score
    pub fn reset_game(&mut self) {
        self.scheduler.reset();
        self.store = EntityStore::new(&self.config);
        self.events.clear();
        self.phase = SessionPhase::Ready;
        log::info!("Game reset");
    }

    /// Flip between `Playing` and `Paused`; ignored in other phases
    pub fn toggle_pause(&mut self) {
        match self.phase {
            SessionPhase::Playing => self.pause(),
            SessionPhase::Paused => self.resume(),
            _ => log::trace!("Pause toggle ignored in {:?}", self.phase),
        }
    }

    pub fn pause(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.scheduler.stop_all();
        self.phase = SessionPhase::Paused;
        log::debug!("Paused at {}ms", self.scheduler.now_ms());
    }

    pub fn resume(&mut self) {
        if self.phase != SessionPhase::Paused {
            return;
        }
        self.phase = SessionPhase::Playing;
        self.start_timers();
        log::debug!("Resumed at {}ms", self.scheduler.now_ms());
    }

    /// End a playing or paused game now, reporting its score like a death
    pub fn end_game(&mut self) {
        if !matches!(self.phase, SessionPhase::Playing | SessionPhase::Paused) {
            return;
        }
        let mark = self.events.len();
        self.enter_game_over();
        self.forward_events(mark);
    }

    /// Run every cadence; the reload timer only while a reload is in progress
    fn start_timers(&mut self) {
        self.scheduler.start_all();
        if !self.store.player.reloading {
            self.scheduler.stop(TimerKind::Reload);
        }
    }

    fn enter_game_over(&mut self) {
        self.scheduler.stop_all();
        self.phase = SessionPhase::GameOver;
        let score = self.store.score;
        log::info!(
            "Game over: score {} at difficulty {} after {}ms",
            score,
            self.store.difficulty.level,
            self.scheduler.now_ms()
        );
        self.events.push(GameEvent::GameOver { score });
        self.sink.report_session(score);
    }

    // --- Input ---

    /// Fire toward a raw direction from the arena center. Returns `None` when
    /// not playing.
    pub fn fire(&mut self, dx: f32, dy: f32) -> Option<FireOutcome> {
        if self.phase != SessionPhase::Playing {
            log::trace!("Fire ignored in {:?}", self.phase);
            return None;
        }

        let mark = self.events.len();
        let outcome = ammo::fire(&mut self.store, Vec2::new(dx, dy), &mut self.events);
        if outcome == FireOutcome::ReloadStarted {
            self.scheduler.restart(TimerKind::Reload);
        }
        self.forward_events(mark);
        Some(outcome)
    }

    /// Turn the barrel without firing
    pub fn aim(&mut self, dx: f32, dy: f32) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        let dir = crate::direction_or_default(Vec2::new(dx, dy));
        self.store.player.aim_angle = crate::cartesian_to_polar(dir).1;
    }

    // --- Time ---

    /// Feed wall-clock time. Ticks are processed in order; nothing happens
    /// outside `Playing`.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.phase != SessionPhase::Playing {
            return;
        }

        let mark = self.events.len();
        let mut budget = elapsed_ms;
        while let Some(kind) = self.scheduler.next_tick(&mut budget) {
            self.on_tick(kind);
            debug_assert!(self.store.check_invariants(&self.config).is_ok());
            if self.phase != SessionPhase::Playing {
                break;
            }
        }
        self.forward_events(mark);
    }

    fn on_tick(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Difficulty => {
                difficulty::ratchet(&mut self.store.difficulty, &self.config, &mut self.events);
                self.scheduler
                    .set_interval(TimerKind::Spawn, self.store.difficulty.spawn_interval_ms);
            }
            TimerKind::Spawn => {
                spawn::spawn_tick(&mut self.store, &self.config, &mut self.rng, &mut self.events);
            }
            TimerKind::EnemyMove => {
                motion::move_enemies(&mut self.store, &self.config);
            }
            TimerKind::BulletMove => {
                let expired = motion::move_bullets(&mut self.store, &self.config);
                let report = collision::resolve(&mut self.store, &self.config, &mut self.events);
                self.record_bullet_tick(expired, &report);
                if self.store.player.is_dead() {
                    self.enter_game_over();
                }
            }
            TimerKind::Reload => {
                let player = &mut self.store.player;
                if !player.reloading || ammo::reload_step(player, &self.config, &mut self.events) {
                    self.scheduler.stop(TimerKind::Reload);
                }
            }
            TimerKind::AmmoRegen => {
                if ammo::regen_tick(&mut self.store.player, &self.config, &mut self.events) {
                    self.scheduler.restart(TimerKind::Reload);
                }
            }
        }
    }

    fn record_bullet_tick(&mut self, expired: usize, report: &CollisionReport) {
        let stats = &mut self.store.stats;
        stats.bullets_expired += expired as u32;
        stats.hits += report.hits;
        stats.kills += report.kills;
        stats.touches += report.touches;

        if *report != CollisionReport::default() {
            log::debug!(
                "t={}ms: {} hits, {} kills (+{}), {} touches (-{} hp)",
                self.scheduler.now_ms(),
                report.hits,
                report.kills,
                report.points,
                report.touches,
                report.damage
            );
        }
        if expired > 0 {
            log::trace!("t={}ms: {} bullets out of range", self.scheduler.now_ms(), expired);
        }
    }

    fn forward_events(&mut self, from: usize) {
        for event in &self.events[from..] {
            self.feedback.emit(event);
        }
        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
            log::trace!("Dropped {} undrained events", excess);
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Scenario hooks ---

    /// Place an enemy directly, without a spawn grace window or cap check.
    /// Only while playing: a paused or finished world stays as it is.
    pub fn insert_enemy(&mut self, tier: EnemyTier, pos: Vec2) -> Option<u32> {
        if self.phase != SessionPhase::Playing || !pos.is_finite() {
            return None;
        }
        Some(spawn::place_enemy(&mut self.store, tier, pos, 0))
    }

    /// Set the clip, clamped to `[0, max_ammo]`. Only while playing.
    pub fn set_ammo(&mut self, ammo: u32) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        self.store.player.ammo = ammo.min(self.config.max_ammo);
    }

    // --- Accessors ---

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.store.score
    }

    pub fn player(&self) -> &Player {
        &self.store.player
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.store.difficulty
    }

    /// Combat tallies for the current game
    pub fn stats(&self) -> &RunStats {
        &self.store.stats
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.store.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.store.bullets
    }

    /// Whole store, for presentation snapshots
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Play time since `start_game` (paused time excluded)
    pub fn elapsed_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }
}
