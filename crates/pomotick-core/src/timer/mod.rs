mod engine;
mod phase;

pub use engine::{Tick, TimerEngine};
pub use phase::Phase;
