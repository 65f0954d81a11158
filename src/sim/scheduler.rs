//! Fixed-rate timer scheduler
//!
//! One `Timer` per cadence, all owned by the session. Wall-clock time is fed in
//! with `next_tick`, which hands back due ticks one at a time in chronological
//! order so the caller can react (and retime other timers) between ticks.
//! Stopped timers keep their phase; nothing accrues while stopped.

use serde::{Deserialize, Serialize};

use crate::settings::ArenaConfig;

/// Independent tick cadences. Declaration order breaks ties between ticks due
/// at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    Difficulty,
    Spawn,
    EnemyMove,
    BulletMove,
    Reload,
    AmmoRegen,
}

impl TimerKind {
    pub const ALL: [TimerKind; 6] = [
        TimerKind::Difficulty,
        TimerKind::Spawn,
        TimerKind::EnemyMove,
        TimerKind::BulletMove,
        TimerKind::Reload,
        TimerKind::AmmoRegen,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// A periodic timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub kind: TimerKind,
    pub interval_ms: u64,
    /// Time since the last tick (or since restart)
    pub elapsed_ms: u64,
    pub running: bool,
}

impl Timer {
    fn new(kind: TimerKind, interval_ms: u64) -> Self {
        Self {
            kind,
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
            running: false,
        }
    }

    /// Time until the next tick
    #[inline]
    pub fn remaining_ms(&self) -> u64 {
        self.interval_ms.saturating_sub(self.elapsed_ms)
    }
}

/// All session timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    timers: [Timer; 6],
    /// Running time accumulated while at least one timer ran
    now_ms: u64,
}

impl Scheduler {
    /// Timers at the configured cadences, all stopped
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            timers: [
                Timer::new(TimerKind::Difficulty, config.difficulty_interval_ms),
                Timer::new(TimerKind::Spawn, config.initial_spawn_interval_ms),
                Timer::new(TimerKind::EnemyMove, config.enemy_move_interval_ms),
                Timer::new(TimerKind::BulletMove, config.bullet_move_interval_ms),
                Timer::new(TimerKind::Reload, config.reload_step_ms),
                Timer::new(TimerKind::AmmoRegen, config.ammo_regen_interval_ms),
            ],
            now_ms: 0,
        }
    }

    pub fn timer(&self, kind: TimerKind) -> &Timer {
        &self.timers[kind.index()]
    }

    fn timer_mut(&mut self, kind: TimerKind) -> &mut Timer {
        &mut self.timers[kind.index()]
    }

    /// Running time since the last `reset`
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_running(&self, kind: TimerKind) -> bool {
        self.timer(kind).running
    }

    pub fn any_running(&self) -> bool {
        self.timers.iter().any(|t| t.running)
    }

    /// Start (or resume) a timer, keeping its phase
    pub fn start(&mut self, kind: TimerKind) {
        self.timer_mut(kind).running = true;
    }

    /// Start a timer from a fresh phase
    pub fn restart(&mut self, kind: TimerKind) {
        let timer = self.timer_mut(kind);
        timer.elapsed_ms = 0;
        timer.running = true;
    }

    /// Stop a timer, keeping its phase
    pub fn stop(&mut self, kind: TimerKind) {
        self.timer_mut(kind).running = false;
    }

    pub fn start_all(&mut self) {
        for timer in &mut self.timers {
            timer.running = true;
        }
    }

    pub fn stop_all(&mut self) {
        for timer in &mut self.timers {
            timer.running = false;
        }
    }

    /// Stop everything and zero all phases and the clock
    pub fn reset(&mut self) {
        for timer in &mut self.timers {
            timer.running = false;
            timer.elapsed_ms = 0;
        }
        self.now_ms = 0;
    }

    /// Change a timer's period; already-elapsed time counts toward the new one
    pub fn set_interval(&mut self, kind: TimerKind, interval_ms: u64) {
        self.timer_mut(kind).interval_ms = interval_ms.max(1);
    }

    /// Pop the next tick due within `budget_ms`, advancing every running timer
    /// up to it and deducting the consumed time from the budget. When nothing is
    /// due inside the budget, the whole budget is consumed and `None` returned.
    pub fn next_tick(&mut self, budget_ms: &mut u64) -> Option<TimerKind> {
        let due = self
            .timers
            .iter()
            .filter(|t| t.running)
            .map(|t| (t.remaining_ms(), t.kind))
            .min();

        match due {
            Some((remaining, kind)) if remaining <= *budget_ms => {
                self.advance_running(remaining);
                *budget_ms -= remaining;
                self.timer_mut(kind).elapsed_ms = 0;
                Some(kind)
            }
            Some(_) => {
                self.advance_running(*budget_ms);
                *budget_ms = 0;
                None
            }
            None => {
                *budget_ms = 0;
                None
            }
        }
    }

    fn advance_running(&mut self, ms: u64) {
        for timer in self.timers.iter_mut().filter(|t| t.running) {
            timer.elapsed_ms += ms;
        }
        self.now_ms += ms;
    }
}
