//! # Pomotick Core Library
//!
//! Core business logic for Pomotick, a persistent, interruption-tolerant
//! interval timer. The engine keeps correct time and state even though its
//! host process can be suspended and restarted at arbitrary moments, and
//! even though observers (a transient UI, audio, notifications) may attach
//! and detach at any time.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a logical one-second countdown state machine; the
//!   caller delivers ticks, the engine advances phases and counts cycles
//! - **Engine Service**: wraps the engine with statistics accounting,
//!   throttled persistence, restart recovery and the command surface
//! - **Storage**: SQLite key-value document store plus TOML host config
//! - **Broadcast**: best-effort fan-out of state snapshots to observers
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: phase, countdown, cycle counting
//! - [`EngineService`]: the single owned instance a host constructs
//! - [`StateStore`]: the persistence port
//! - [`Config`]: host configuration management

pub mod broadcast;
pub mod command;
pub mod error;
pub mod events;
pub mod service;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use broadcast::{Hub, Observer, ObserverId};
pub use command::{Command, Response};
pub use error::{CoreError, Result};
pub use events::{Effect, EffectSink, Event, NullEffects};
pub use service::{EngineService, ManualTickSource, TickSource, SAVE_THROTTLE};
pub use settings::Settings;
pub use stats::Statistics;
pub use storage::{Config, Database, MemoryStore, PersistedDocument, SqliteStore, StateStore};
pub use timer::{Phase, Tick, TimerEngine};
