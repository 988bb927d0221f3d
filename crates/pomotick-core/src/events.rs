//! Broadcast events and side-effect requests.
//!
//! Every state change the engine makes while ticking produces an [`Event`]
//! that is fanned out to observers. Effects are requests to external
//! collaborators (notifier, audio); the engine never performs them itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stats::Statistics;
use crate::timer::{Phase, TimerEngine};

/// Fire-and-forget broadcast from engine to observers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    /// A non-terminal countdown decrement.
    Tick {
        state: TimerEngine,
        statistics: Statistics,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and the phase advanced.
    PhaseCompleted {
        state: TimerEngine,
        statistics: Statistics,
        completed_phase: Phase,
        at: DateTime<Utc>,
    },
}

/// Side-effect request to an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum Effect {
    /// Request a user-facing notification naming the phase that just ended.
    Notify { phase: Phase },
    /// Request an audio completion cue.
    PlayCue,
}

/// Recipient of side-effect requests.
///
/// Implementations must not block; delivery is best-effort.
pub trait EffectSink {
    fn handle(&self, effect: Effect);
}

/// Discards every effect. Useful for tests and headless commands.
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn handle(&self, _effect: Effect) {}
}
