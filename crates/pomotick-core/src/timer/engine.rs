//! Timer engine implementation.
//!
//! The engine is a logical one-second countdown state machine. It has no
//! internal thread and no clock -- the caller delivers ticks (nominally once
//! per second) and the engine advances its state to completion before
//! returning. Its serialized form is both the persisted document entry and
//! the state snapshot broadcast to observers.
//!
//! ## State transitions
//!
//! ```text
//! Idle(phase) -> Running(phase) -> Idle(phase | next phase)
//! ```
//!
//! Phase advancement, cycle counting and auto-restart are all derived from a
//! single completion rule, run exactly once per zero-crossing: because the
//! countdown for the next phase is reloaded in the same call that detects
//! zero, a duplicate tick can never re-run completion for the same crossing.

use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::settings::Settings;

/// Core timer state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerEngine {
    #[serde(default)]
    phase: Phase,
    #[serde(default = "default_remaining")]
    remaining_seconds: u32,
    #[serde(default = "default_remaining")]
    total_seconds: u32,
    #[serde(default)]
    is_running: bool,
    /// Work completions since the last long break, always in
    /// `[0, cycles_before_long_break)`.
    #[serde(default)]
    cycles_since_long_break: u32,
    #[serde(default)]
    settings: Settings,
}

fn default_remaining() -> u32 {
    Settings::default().duration_seconds(Phase::Work)
}

/// Outcome of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Tick arrived while idle; nothing changed.
    Ignored,
    /// Countdown decremented without reaching zero.
    Counted,
    /// Countdown hit zero; the named phase completed and the engine moved
    /// to the next one.
    Completed(Phase),
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl TimerEngine {
    /// Create an idle engine at the start of a Work phase.
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        let total = settings.duration_seconds(Phase::Work);
        Self {
            phase: Phase::Work,
            remaining_seconds: total,
            total_seconds: total,
            is_running: false,
            cycles_since_long_break: 0,
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn cycles_since_long_break(&self) -> u32 {
        self.cycles_since_long_break
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_seconds as f64 / self.total_seconds as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. Returns false when already running.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        self.is_running = true;
        true
    }

    /// Stop counting down, keeping the remaining time.
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Stop and reload the current phase to its full duration.
    pub fn reset(&mut self) {
        self.is_running = false;
        self.reload_countdown();
    }

    /// Switch to `phase` manually, stopped, at its full duration.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.is_running = false;
        self.reload_countdown();
    }

    /// Replace the embedded settings.
    ///
    /// While idle the countdown is reloaded for the new durations; while
    /// running the live countdown is left untouched and the new durations
    /// take effect from the next phase.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.clamp_cycle_counter();
        if !self.is_running {
            self.reload_countdown();
        }
    }

    /// Deliver one one-second tick.
    pub fn tick(&mut self) -> Tick {
        if !self.is_running {
            return Tick::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            Tick::Completed(self.complete_phase())
        } else {
            Tick::Counted
        }
    }

    // ── Load path ────────────────────────────────────────────────────

    /// Replace the embedded settings without touching the live countdown.
    ///
    /// Used when restoring from storage, where the separately persisted
    /// settings win over the copy embedded in the timer state and the
    /// remaining time must survive as-is.
    pub(crate) fn adopt_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
    }

    /// Re-establish invariants on a state loaded from storage.
    pub(crate) fn sanitize_loaded(&mut self) {
        self.settings = self.settings.clone().sanitized();
        if self.total_seconds == 0 {
            self.reload_countdown();
        }
        if self.remaining_seconds > self.total_seconds {
            self.remaining_seconds = self.total_seconds;
        }
        self.clamp_cycle_counter();
    }

    /// Keep the counter inside `[0, cycles_before_long_break)` when the
    /// threshold shrinks under it; the next work completion then triggers
    /// the long break.
    fn clamp_cycle_counter(&mut self) {
        let max = self.settings.cycles_before_long_break - 1;
        if self.cycles_since_long_break > max {
            self.cycles_since_long_break = max;
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The phase-completion rule: advance the phase, count the cycle, reload
    /// the countdown, and decide running-ness from the auto-start setting.
    fn complete_phase(&mut self) -> Phase {
        let finished = self.phase;
        self.phase = match finished {
            Phase::Work => {
                self.cycles_since_long_break += 1;
                if self.cycles_since_long_break >= self.settings.cycles_before_long_break {
                    self.cycles_since_long_break = 0;
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.reload_countdown();
        self.is_running = self.settings.auto_start_enabled;
        finished
    }

    fn reload_countdown(&mut self) {
        self.total_seconds = self.settings.duration_seconds(self.phase);
        self.remaining_seconds = self.total_seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(settings: Settings) -> TimerEngine {
        TimerEngine::new(settings)
    }

    fn run_out_phase(engine: &mut TimerEngine) -> Phase {
        engine.start();
        loop {
            if let Tick::Completed(finished) = engine.tick() {
                return finished;
            }
        }
    }

    #[test]
    fn starts_idle_in_work_phase() {
        let engine = TimerEngine::default();
        assert_eq!(engine.phase(), Phase::Work);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_seconds(), 25 * 60);
        assert_eq!(engine.total_seconds(), 25 * 60);
    }

    #[test]
    fn tick_while_idle_is_ignored() {
        let mut engine = TimerEngine::default();
        assert_eq!(engine.tick(), Tick::Ignored);
        assert_eq!(engine.remaining_seconds(), 25 * 60);
    }

    #[test]
    fn start_tick_decrements_once() {
        let mut engine = TimerEngine::default();
        assert!(engine.start());
        assert!(!engine.start()); // already running
        assert_eq!(engine.tick(), Tick::Counted);
        assert_eq!(engine.remaining_seconds(), 25 * 60 - 1);
    }

    #[test]
    fn pause_keeps_remaining_reset_reloads() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        engine.tick();
        engine.pause();
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_seconds(), 25 * 60 - 2);
        engine.reset();
        assert_eq!(engine.remaining_seconds(), 25 * 60);
        assert_eq!(engine.total_seconds(), 25 * 60);
    }

    #[test]
    fn pause_then_reset_in_short_break() {
        let mut engine = TimerEngine::default();
        engine.set_phase(Phase::ShortBreak);
        engine.start();
        engine.tick();
        engine.pause();
        engine.reset();
        assert_eq!(engine.remaining_seconds(), 300);
        assert_eq!(engine.total_seconds(), 300);
        assert!(!engine.is_running());
    }

    #[test]
    fn work_completion_advances_to_short_break() {
        let mut engine = TimerEngine::default();
        let finished = run_out_phase(&mut engine);
        assert_eq!(finished, Phase::Work);
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.remaining_seconds(), 300);
        assert_eq!(engine.cycles_since_long_break(), 1);
        assert!(!engine.is_running());
    }

    #[test]
    fn fourth_work_completion_yields_long_break_and_resets_counter() {
        let mut engine = TimerEngine::default();
        for expected_cycles in 1..4 {
            assert_eq!(run_out_phase(&mut engine), Phase::Work);
            assert_eq!(engine.phase(), Phase::ShortBreak);
            assert_eq!(engine.cycles_since_long_break(), expected_cycles);
            assert_eq!(run_out_phase(&mut engine), Phase::ShortBreak);
            assert_eq!(engine.phase(), Phase::Work);
        }
        assert_eq!(run_out_phase(&mut engine), Phase::Work);
        assert_eq!(engine.phase(), Phase::LongBreak);
        assert_eq!(engine.cycles_since_long_break(), 0);
    }

    #[test]
    fn break_completion_returns_to_work() {
        let mut engine = TimerEngine::default();
        engine.set_phase(Phase::LongBreak);
        let finished = run_out_phase(&mut engine);
        assert_eq!(finished, Phase::LongBreak);
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.cycles_since_long_break(), 0);
    }

    #[test]
    fn completion_is_not_rerun_by_a_duplicate_tick() {
        let mut settings = Settings::default();
        settings.work_minutes = 1;
        settings.auto_start_enabled = true;
        let mut engine = engine_with(settings);
        engine.start();
        for _ in 0..59 {
            assert_eq!(engine.tick(), Tick::Counted);
        }
        assert_eq!(engine.tick(), Tick::Completed(Phase::Work));
        // Auto-start kept it running in the new phase; the next tick counts
        // against the fresh countdown instead of completing again.
        assert!(engine.is_running());
        assert_eq!(engine.phase(), Phase::ShortBreak);
        assert_eq!(engine.tick(), Tick::Counted);
        assert_eq!(engine.remaining_seconds(), 299);
    }

    #[test]
    fn auto_start_disabled_stops_at_phase_boundary() {
        let mut settings = Settings::default();
        settings.work_minutes = 1;
        let mut engine = engine_with(settings);
        run_out_phase(&mut engine);
        assert!(!engine.is_running());
        assert_eq!(engine.tick(), Tick::Ignored);
    }

    #[test]
    fn apply_settings_while_idle_reloads_countdown() {
        let mut engine = TimerEngine::default();
        let mut settings = Settings::default();
        settings.work_minutes = 50;
        engine.apply_settings(settings);
        assert_eq!(engine.remaining_seconds(), 50 * 60);
        assert_eq!(engine.total_seconds(), 50 * 60);
    }

    #[test]
    fn apply_settings_while_running_keeps_live_countdown() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        let before = engine.remaining_seconds();
        let mut settings = Settings::default();
        settings.work_minutes = 50;
        engine.apply_settings(settings);
        assert_eq!(engine.remaining_seconds(), before);
        // New duration applies once the phase is re-entered.
        engine.reset();
        assert_eq!(engine.remaining_seconds(), 50 * 60);
    }

    #[test]
    fn shrinking_cycle_threshold_clamps_the_counter() {
        let mut engine = TimerEngine::default();
        run_out_phase(&mut engine); // Work done, counter = 1
        run_out_phase(&mut engine); // ShortBreak done
        run_out_phase(&mut engine); // counter = 2
        assert_eq!(engine.cycles_since_long_break(), 2);

        let mut settings = Settings::default();
        settings.cycles_before_long_break = 2;
        engine.apply_settings(settings);
        assert_eq!(engine.cycles_since_long_break(), 1);

        run_out_phase(&mut engine); // ShortBreak done
        assert_eq!(run_out_phase(&mut engine), Phase::Work);
        assert_eq!(engine.phase(), Phase::LongBreak);
        assert_eq!(engine.cycles_since_long_break(), 0);
    }

    #[test]
    fn invalid_settings_are_sanitized_on_apply() {
        let mut engine = TimerEngine::default();
        let mut settings = Settings::default();
        settings.short_break_minutes = 0;
        engine.apply_settings(settings);
        assert_eq!(engine.settings().short_break_minutes, 5);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut engine = TimerEngine::default();
        engine.start();
        engine.tick();
        let json = serde_json::to_string(&engine).unwrap();
        assert!(json.contains("\"remainingSeconds\""));
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.remaining_seconds(), engine.remaining_seconds());
        assert!(restored.is_running());
    }

    #[test]
    fn empty_document_restores_to_defaults() {
        let restored: TimerEngine = serde_json::from_str("{}").unwrap();
        assert_eq!(restored.phase(), Phase::Work);
        assert_eq!(restored.remaining_seconds(), 25 * 60);
        assert!(!restored.is_running());
    }
}
