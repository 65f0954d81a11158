//! Entity store and core simulation types
//!
//! All mutable session state lives here: enemies, bullets, the player and the
//! difficulty ratchet. Components mutate it only through the session.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cartesian_to_polar;
use crate::settings::ArenaConfig;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the first `start_game`
    #[default]
    Ready,
    /// Active gameplay, timers running
    Playing,
    /// Timers stopped, world frozen
    Paused,
    /// Health ran out; terminal until restart
    GameOver,
}

/// Enemy strength class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyTier {
    Weak,
    Medium,
    Strong,
}

impl EnemyTier {
    /// Tier for a uniform roll in [0, 1)
    pub fn from_roll(r: f32) -> Self {
        if r > 0.7 {
            EnemyTier::Strong
        } else if r > 0.4 {
            EnemyTier::Medium
        } else {
            EnemyTier::Weak
        }
    }

    pub fn hit_points(&self) -> u8 {
        match self {
            EnemyTier::Weak => 1,
            EnemyTier::Medium => 2,
            EnemyTier::Strong => 3,
        }
    }

    /// Weak enemies are the fastest
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            EnemyTier::Weak => 1.5,
            EnemyTier::Medium => 1.25,
            EnemyTier::Strong => 1.2,
        }
    }

    pub fn score_value(&self) -> u64 {
        match self {
            EnemyTier::Weak => 10,
            EnemyTier::Medium => 20,
            EnemyTier::Strong => 30,
        }
    }

    pub fn touch_damage(&self) -> u32 {
        match self {
            EnemyTier::Weak => 10,
            EnemyTier::Medium => 20,
            EnemyTier::Strong => 30,
        }
    }
}

/// A hostile unit converging on the arena center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Position relative to arena center
    pub pos: Vec2,
    /// Angle of the spawn placement (radians, fixed at creation)
    pub approach_angle: f32,
    pub tier: EnemyTier,
    pub hit_points: u8,
    /// Enemy-move ticks left before the enemy moves and collides
    pub spawn_grace: u32,
}

impl Enemy {
    pub fn new(id: u32, tier: EnemyTier, pos: Vec2, spawn_grace: u32) -> Self {
        let (_, approach_angle) = cartesian_to_polar(pos);
        Self {
            id,
            pos,
            approach_angle,
            tier,
            hit_points: tier.hit_points(),
            spawn_grace,
        }
    }

    /// Still spawning in (exempt from motion and collision)
    #[inline]
    pub fn is_spawning(&self) -> bool {
        self.spawn_grace > 0
    }

    /// Distance per enemy-move tick
    #[inline]
    pub fn speed(&self, base_speed: f32) -> f32 {
        base_speed * self.tier.speed_multiplier()
    }
}

/// A fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Unit heading
    pub dir: Vec2,
    /// Total path length so far (range expiry)
    pub traveled: f32,
}

impl Bullet {
    /// New bullet at the arena center heading along `dir` (already unit length)
    pub fn new(id: u32, dir: Vec2) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            dir,
            traveled: 0.0,
        }
    }
}

/// The defender at the arena center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub health: u32,
    pub ammo: u32,
    pub reloading: bool,
    /// Reload progress 0-100
    pub reload_progress: u8,
    /// Time spent in the current reload
    pub reload_elapsed_ms: u64,
    /// Last aim direction (radians, presentation only)
    pub aim_angle: f32,
}

impl Player {
    pub fn new(max_health: u32, max_ammo: u32) -> Self {
        Self {
            health: max_health,
            ammo: max_ammo,
            reloading: false,
            reload_progress: 0,
            reload_elapsed_ms: 0,
            aim_angle: 0.0,
        }
    }

    /// Fire is accepted in this state
    #[inline]
    pub fn can_fire(&self) -> bool {
        !self.reloading && self.ammo > 0
    }

    /// Ammo as the HUD shows it (locked at 0 while reloading)
    pub fn displayed_ammo(&self) -> u32 {
        if self.reloading { 0 } else { self.ammo }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// Difficulty ratchet values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Starts at 1, never decreases
    pub level: u32,
    /// Never increases, floored at `min_spawn_interval_ms`
    pub spawn_interval_ms: u64,
    /// Never decreases
    pub max_live_enemies: u32,
}

impl Difficulty {
    pub fn initial(config: &ArenaConfig) -> Self {
        Self {
            level: 1,
            spawn_interval_ms: config.initial_spawn_interval_ms,
            max_live_enemies: config.initial_max_enemies,
        }
    }
}

/// Per-game combat tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub shots_fired: u32,
    /// Bullets that struck an enemy
    pub hits: u32,
    pub kills: u32,
    /// Enemies that reached the player
    pub touches: u32,
    /// Bullets that flew out of range
    pub bullets_expired: u32,
}

/// Events emitted by the simulation for presentation/haptics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A bullet left the barrel
    Fired,
    EnemySpawned { id: u32, tier: EnemyTier },
    /// Non-lethal bullet hit
    EnemyHit { id: u32, tier: EnemyTier },
    EnemyKilled { id: u32, tier: EnemyTier, points: u64 },
    /// An enemy reached the player
    PlayerHit { damage: u32, health: u32 },
    DifficultyIncrease { level: u32 },
    ReloadStart,
    ReloadComplete,
    GameOver { score: u64 },
}

impl GameEvent {
    /// Vibration length for this event, if it buzzes
    pub fn haptic_ms(&self) -> Option<u32> {
        match self {
            GameEvent::Fired => Some(50),
            GameEvent::PlayerHit { .. } => Some(100),
            GameEvent::DifficultyIncrease { .. } => Some(200),
            GameEvent::GameOver { .. } => Some(500),
            _ => None,
        }
    }
}

/// Complete mutable state of a running session (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    /// Live enemies (ascending id: appended on spawn, removed with `retain`)
    pub enemies: Vec<Enemy>,
    /// Live bullets (ascending id)
    pub bullets: Vec<Bullet>,
    pub player: Player,
    /// Never decreases within a session
    pub score: u64,
    pub difficulty: Difficulty,
    pub stats: RunStats,
    /// Next entity ID
    next_id: u32,
}

impl EntityStore {
    /// Fresh store with the configured starting values
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            enemies: Vec::new(),
            bullets: Vec::new(),
            player: Player::new(config.max_health, config.max_ammo),
            score: 0,
            difficulty: Difficulty::initial(config),
            stats: RunStats::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Enemies currently alive (spawning ones included)
    #[inline]
    pub fn live_enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Check the store's invariants, returning the first violation
    pub fn check_invariants(&self, config: &ArenaConfig) -> Result<(), String> {
        if self.player.health > config.max_health {
            return Err(format!("health {} above max", self.player.health));
        }
        if self.player.ammo > config.max_ammo {
            return Err(format!("ammo {} above max", self.player.ammo));
        }
        if self.player.reload_progress > 100 {
            return Err(format!("reload progress {}", self.player.reload_progress));
        }
        if let Some(e) = self.enemies.iter().find(|e| e.hit_points == 0) {
            return Err(format!("enemy {} stored with 0 hp", e.id));
        }
        if let Some(b) = self
            .bullets
            .iter()
            .find(|b| !b.pos.is_finite() || (b.dir.length() - 1.0).abs() > 1e-3)
        {
            return Err(format!("bullet {} has bad heading/position", b.id));
        }
        if self.enemies.iter().any(|e| !e.pos.is_finite()) {
            return Err("enemy with non-finite position".to_string());
        }
        if self.difficulty.spawn_interval_ms < config.min_spawn_interval_ms {
            return Err("spawn interval below floor".to_string());
        }
        Ok(())
    }
}
