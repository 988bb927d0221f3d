//! Command surface exposed to observers.
//!
//! Commands arrive as string-tagged wire objects but dispatch over a closed
//! enum, so coverage of every action is checked at compile time. An
//! unrecognized action still has to be tolerated on the wire -- it answers
//! with the current state, never an error -- which is what the `Unknown`
//! catch-all variant is for.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::stats::Statistics;
use crate::timer::{Phase, TimerEngine};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    GetState,
    Start,
    Pause,
    Reset,
    SetPhase { phase: Phase },
    ApplySettings { settings: Settings },
    GetSettings,
    /// Any action name this build does not recognize.
    #[serde(other)]
    Unknown,
}

/// Reply to a command.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Status {
        state: TimerEngine,
        statistics: Statistics,
    },
    Settings(Settings),
}
