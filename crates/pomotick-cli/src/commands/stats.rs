use clap::Subcommand;

use super::open_service;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print today's statistics as JSON
    Show,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StatsAction::Show => {
            let service = open_service()?;
            println!("{}", serde_json::to_string_pretty(service.statistics())?);
        }
    }
    Ok(())
}
