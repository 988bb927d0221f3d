use clap::Subcommand;

use pomotick_core::{Command, Config};

use super::open_service;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the whole config as TOML
    Show,
    /// Get a config value by dot-separated key
    Get {
        /// Key, e.g. `timer.work_minutes`
        key: String,
    },
    /// Set a config value and apply it to the timer
    Set {
        /// Key, e.g. `timer.work_minutes`
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let cfg = Config::load()?;
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigAction::Get { key } => match Config::load()?.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown config key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            let mut cfg = Config::load()?;
            cfg.set(&key, &value)?;
            cfg.save()?;

            // The config file is the settings collaborator; push the new
            // record into the engine document wholesale.
            let mut service = open_service()?;
            let response = service.handle(Command::ApplySettings {
                settings: cfg.settings(),
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
