//! Engine service: the one owned instance wrapping the timer state machine
//! with statistics accounting, persistence discipline, observer broadcast and
//! the command surface.
//!
//! The service is single-threaded by design: every command and tick is
//! processed to completion before the next one, so no two mutations ever
//! interleave. The host constructs it once at process start with its
//! storage, tick-source and effect-sink dependencies injected.

use std::time::{Duration, Instant};

use chrono::Utc;

use crate::broadcast::{Hub, Observer, ObserverId};
use crate::command::{Command, Response};
use crate::events::{Effect, EffectSink, Event};
use crate::settings::Settings;
use crate::stats::Statistics;
use crate::storage::{PersistedDocument, StateStore};
use crate::timer::{Phase, Tick, TimerEngine};

/// Default window for coalescing routine tick saves.
pub const SAVE_THROTTLE: Duration = Duration::from_secs(5);

/// The periodic trigger the engine counts down against.
///
/// The source guarantees tick delivery while subscribed; the engine is
/// responsible for re-subscribing after any restart that recovers a running
/// state. `subscribe` on an already-subscribed source must not create a
/// second subscription.
pub trait TickSource {
    fn subscribe(&mut self);
    fn unsubscribe(&mut self);
    fn is_subscribed(&self) -> bool;
}

/// Tick source driven explicitly by the host loop.
#[derive(Debug, Default)]
pub struct ManualTickSource {
    subscribed: bool,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TickSource for ManualTickSource {
    fn subscribe(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}

/// Coalesces routine saves to at most one per window.
///
/// The engine is synchronous, so a "pending" throttled save is a dirty flag:
/// the write happens on the next tick falling outside the window. An
/// immediate save writes at once and clears the flag, which is what keeps
/// writes from ever being reordered.
#[derive(Debug)]
struct SaveThrottle {
    window: Duration,
    last_write: Option<Instant>,
    dirty: bool,
}

impl SaveThrottle {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_write: None,
            dirty: false,
        }
    }

    fn due(&self, now: Instant) -> bool {
        match self.last_write {
            None => true,
            Some(at) => now.duration_since(at) >= self.window,
        }
    }

    fn wrote(&mut self, now: Instant) {
        self.last_write = Some(now);
        self.dirty = false;
    }

    fn defer(&mut self) {
        self.dirty = true;
    }
}

/// The single in-process timer instance.
pub struct EngineService {
    engine: TimerEngine,
    statistics: Statistics,
    store: Box<dyn StateStore>,
    tick_source: Box<dyn TickSource>,
    effects: Box<dyn EffectSink>,
    hub: Hub,
    throttle: SaveThrottle,
}

impl EngineService {
    /// Load persisted state and wire up the collaborators.
    ///
    /// A load failure is never fatal: the service starts from defaults and
    /// logs the reason. If the recovered state was running, the tick
    /// subscription is re-established immediately -- the host may have
    /// discarded it across a suspension.
    pub fn new(
        store: Box<dyn StateStore>,
        tick_source: Box<dyn TickSource>,
        effects: Box<dyn EffectSink>,
    ) -> Self {
        Self::with_throttle_window(store, tick_source, effects, SAVE_THROTTLE)
    }

    pub fn with_throttle_window(
        store: Box<dyn StateStore>,
        tick_source: Box<dyn TickSource>,
        effects: Box<dyn EffectSink>,
        window: Duration,
    ) -> Self {
        let doc = match store.load() {
            Ok(Some(doc)) => doc,
            Ok(None) => PersistedDocument::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load persisted state; starting fresh");
                PersistedDocument::default()
            }
        };

        let mut engine = doc.timer_state;
        engine.adopt_settings(doc.settings);
        engine.sanitize_loaded();

        let mut statistics = doc.statistics;
        let rolled_over = statistics.roll_over_today();

        let mut service = Self {
            engine,
            statistics,
            store,
            tick_source,
            effects,
            hub: Hub::new(),
            throttle: SaveThrottle::new(window),
        };

        if service.engine.is_running() {
            tracing::info!("recovered a running timer; re-subscribing to tick source");
            service.tick_source.unsubscribe();
            service.tick_source.subscribe();
        }
        if rolled_over {
            service.persist_immediate();
        }
        service
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn settings(&self) -> &Settings {
        self.engine.settings()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    /// Whether a live tick subscription exists.
    pub fn tick_subscribed(&self) -> bool {
        self.tick_source.is_subscribed()
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe_observer(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        self.hub.subscribe(observer)
    }

    pub fn unsubscribe_observer(&mut self, id: ObserverId) {
        self.hub.unsubscribe(id);
    }

    // ── Command surface ──────────────────────────────────────────────

    /// Apply one command and answer with the resulting state.
    pub fn handle(&mut self, command: Command) -> Response {
        match command {
            Command::GetState => {}
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::SetPhase { phase } => self.set_phase(phase),
            Command::ApplySettings { settings } => self.apply_settings(settings),
            Command::GetSettings => return Response::Settings(self.engine.settings().clone()),
            Command::Unknown => {
                tracing::debug!("ignoring unknown command");
            }
        }
        self.status_response()
    }

    fn start(&mut self) {
        if self.engine.start() {
            // Clear any existing subscription first; a duplicate would
            // double-decrement the countdown.
            self.tick_source.unsubscribe();
            self.tick_source.subscribe();
        }
        self.persist_immediate();
    }

    fn pause(&mut self) {
        self.engine.pause();
        self.tick_source.unsubscribe();
        self.persist_immediate();
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.tick_source.unsubscribe();
        self.persist_immediate();
    }

    fn set_phase(&mut self, phase: Phase) {
        self.engine.set_phase(phase);
        self.tick_source.unsubscribe();
        self.persist_immediate();
    }

    fn apply_settings(&mut self, settings: Settings) {
        self.engine.apply_settings(settings);
        self.persist_immediate();
    }

    // ── Tick path ────────────────────────────────────────────────────

    /// Deliver one tick from the tick source.
    pub fn on_tick(&mut self) {
        let work_second = self.engine.is_running() && self.engine.phase().is_work();
        match self.engine.tick() {
            Tick::Ignored => {}
            Tick::Counted => {
                if work_second {
                    self.statistics.record_work_second();
                }
                self.persist_throttled();
                self.hub.publish(&Event::Tick {
                    state: self.engine.clone(),
                    statistics: self.statistics.clone(),
                    at: Utc::now(),
                });
            }
            Tick::Completed(finished) => {
                if work_second {
                    self.statistics.record_work_second();
                }
                if finished.is_work() {
                    self.statistics.record_work_completion();
                }
                if !self.engine.is_running() {
                    self.tick_source.unsubscribe();
                }
                if self.engine.settings().notifications_enabled {
                    self.effects.handle(Effect::Notify { phase: finished });
                }
                if self.engine.settings().sound_enabled {
                    self.effects.handle(Effect::PlayCue);
                }
                self.persist_immediate();
                self.hub.publish(&Event::PhaseCompleted {
                    state: self.engine.clone(),
                    statistics: self.statistics.clone(),
                    completed_phase: finished,
                    at: Utc::now(),
                });
            }
        }
    }

    // ── Persistence discipline ───────────────────────────────────────

    /// Write any deferred state before the process goes away.
    pub fn flush(&mut self) {
        if self.throttle.dirty {
            self.persist_immediate();
        }
    }

    fn document(&self) -> PersistedDocument {
        PersistedDocument {
            settings: self.engine.settings().clone(),
            timer_state: self.engine.clone(),
            statistics: self.statistics.clone(),
        }
    }

    fn persist_immediate(&mut self) {
        let now = Instant::now();
        match self.store.save(&self.document()) {
            Ok(()) => self.throttle.wrote(now),
            Err(err) => {
                // Never fatal; the next mutation retries.
                self.throttle.defer();
                tracing::warn!(error = %err, "state save failed; will retry");
            }
        }
    }

    fn persist_throttled(&mut self) {
        if self.throttle.due(Instant::now()) {
            self.persist_immediate();
        } else {
            self.throttle.defer();
        }
    }

    fn status_response(&self) -> Response {
        Response::Status {
            state: self.engine.clone(),
            statistics: self.statistics.clone(),
        }
    }
}
