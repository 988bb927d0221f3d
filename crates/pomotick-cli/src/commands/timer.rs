use clap::{Subcommand, ValueEnum};

use pomotick_core::{Command, Event, Observer, Phase};

use super::open_service;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Reset the current phase to its full duration
    Reset,
    /// Switch to a phase (stops the countdown)
    Phase {
        /// Phase to switch to
        phase: PhaseArg,
    },
    /// Deliver one tick (host-driven advancement)
    Tick,
    /// Print current timer state as JSON
    Status,
    /// Run a live one-second tick loop, printing every event
    Watch {
        /// Start the countdown before watching
        #[arg(long)]
        start: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PhaseArg {
    Work,
    ShortBreak,
    LongBreak,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Work => Phase::Work,
            PhaseArg::ShortBreak => Phase::ShortBreak,
            PhaseArg::LongBreak => Phase::LongBreak,
        }
    }
}

/// Prints every broadcast event as one JSON line.
struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn name(&self) -> &str {
        "console"
    }

    fn notify(&self, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
        println!("{}", serde_json::to_string(event)?);
        Ok(())
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Start => respond(Command::Start),
        TimerAction::Pause => respond(Command::Pause),
        TimerAction::Reset => respond(Command::Reset),
        TimerAction::Phase { phase } => respond(Command::SetPhase {
            phase: phase.into(),
        }),
        TimerAction::Tick => {
            let mut service = open_service()?;
            service.on_tick();
            let response = service.handle(Command::GetState);
            println!("{}", serde_json::to_string_pretty(&response)?);
            service.flush();
            Ok(())
        }
        TimerAction::Status => respond(Command::GetState),
        TimerAction::Watch { start } => watch(start),
    }
}

fn respond(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = open_service()?;
    let response = service.handle(command);
    println!("{}", serde_json::to_string_pretty(&response)?);
    service.flush();
    Ok(())
}

/// Live tick source: a tokio one-second interval drives the engine for as
/// long as this process runs. A state recovered with the running flag set
/// resumes ticking without an explicit start.
fn watch(start: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = open_service()?;
    service.subscribe_observer(Box::new(ConsoleObserver));

    if start {
        let response = service.handle(Command::Start);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if service.is_running() {
        tracing::info!("resuming recovered running timer");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First tick of a tokio interval fires immediately; skip it so the
        // countdown starts a full second after the command.
        interval.tick().await;
        loop {
            interval.tick().await;
            if service.tick_subscribed() {
                service.on_tick();
            }
        }
    })
}
