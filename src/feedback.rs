//! Feedback port
//!
//! The simulation reports what happened as `GameEvent`s; haptics, audio and
//! presentation consume them here. Emission is fire-and-forget: nothing the
//! port does can affect the simulation.

use crate::sim::GameEvent;

/// Receiver of simulation events
pub trait FeedbackPort {
    fn emit(&mut self, event: &GameEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackPort for NullFeedback {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Records every event in order
impl FeedbackPort for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Haptic driver stand-in: tallies requested vibrations
#[derive(Debug, Clone, Default)]
pub struct HapticLog {
    /// Vibration lengths requested, in order
    pub pulses: Vec<u32>,
    muted: bool,
}

impl HapticLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute vibration
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Total vibration time requested
    pub fn total_ms(&self) -> u64 {
        self.pulses.iter().map(|&ms| ms as u64).sum()
    }
}

impl FeedbackPort for HapticLog {
    fn emit(&mut self, event: &GameEvent) {
        if self.muted {
            return;
        }
        if let Some(ms) = event.haptic_ms() {
            self.pulses.push(ms);
        }
    }
}
