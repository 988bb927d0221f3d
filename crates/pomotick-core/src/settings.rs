//! Timer settings.
//!
//! Settings are supplied wholesale by the host (CLI config file, GUI form)
//! and copied into the engine state on apply. Every field carries a serde
//! default so a partially persisted document merges cleanly, and
//! [`Settings::sanitized`] substitutes the default for any value the engine
//! cannot run with.

use serde::{Deserialize, Serialize};

use crate::timer::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_cycles_before_long_break")]
    pub cycles_before_long_break: u32,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub auto_start_enabled: bool,
}

fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_cycles_before_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            cycles_before_long_break: default_cycles_before_long_break(),
            sound_enabled: true,
            notifications_enabled: true,
            auto_start_enabled: false,
        }
    }
}

impl Settings {
    /// Duration of one full countdown for `phase`, in seconds.
    pub fn duration_seconds(&self, phase: Phase) -> u32 {
        let minutes = match phase {
            Phase::Work => self.work_minutes,
            Phase::ShortBreak => self.short_break_minutes,
            Phase::LongBreak => self.long_break_minutes,
        };
        minutes.saturating_mul(60)
    }

    /// Replace any zero duration or cycle count with its default.
    ///
    /// Invalid input is self-corrected rather than rejected; the engine has
    /// no user-visible error channel to surface it on.
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        if self.work_minutes == 0 {
            self.work_minutes = defaults.work_minutes;
        }
        if self.short_break_minutes == 0 {
            self.short_break_minutes = defaults.short_break_minutes;
        }
        if self.long_break_minutes == 0 {
            self.long_break_minutes = defaults.long_break_minutes;
        }
        if self.cycles_before_long_break == 0 {
            self.cycles_before_long_break = defaults.cycles_before_long_break;
        }
        self
    }
}
