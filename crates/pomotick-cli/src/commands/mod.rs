pub mod config;
pub mod stats;
pub mod timer;

use pomotick_core::{Effect, EffectSink, EngineService, ManualTickSource, SqliteStore};

/// Build the engine service over the on-disk store.
///
/// One service instance per CLI invocation; the persisted document carries
/// state across invocations.
pub fn open_service() -> Result<EngineService, Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;
    Ok(EngineService::new(
        Box::new(store),
        Box::new(ManualTickSource::new()),
        Box::new(ConsoleEffects),
    ))
}

/// Effect sink for interactive runs: prints completion cues to stderr.
pub struct ConsoleEffects;

impl EffectSink for ConsoleEffects {
    fn handle(&self, effect: Effect) {
        match effect {
            Effect::Notify { phase } => {
                eprintln!("[notify] {} complete", phase.label());
            }
            Effect::PlayCue => {
                // Terminal bell stands in for the audio collaborator.
                eprint!("\x07");
            }
        }
    }
}
