use anyhow::Result;
use owo_colors::OwoColorize;
use studycal_core::EventStore;
use studycal_core::config::StudycalConfig;

pub fn run(config: &StudycalConfig, store: &EventStore) -> Result<()> {
    let config_path = StudycalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Events:  {}", store.path().display());
    println!();
    println!("{}", "Settings".bold());
    println!("  Week starts on:  {:?}", config.week_start);
    println!("  Events stored:   {}", store.len());

    Ok(())
}
