pub mod add;
pub mod config;
pub mod delete;
pub mod edit;
pub mod events;
pub mod list;
pub mod month;

use std::path::PathBuf;

use anyhow::{Result, bail};
use log::warn;
use owo_colors::OwoColorize;
use studycal_core::EventStore;
use studycal_core::config::StudycalConfig;

/// Loaded config and event store shared by every command.
pub struct Session {
    pub config: StudycalConfig,
    pub store: EventStore,
}

impl Session {
    /// Load config and events. `file` overrides the configured event file.
    pub fn open(file: Option<PathBuf>) -> Result<Self> {
        let config = StudycalConfig::load()?;
        let path = file.unwrap_or_else(|| config.events_path());
        let store = open_store(path)?;

        Ok(Session { config, store })
    }
}

/// Load the event file at `path`.
///
/// An unreadable event file is moved aside after warning the user, and an
/// empty calendar is written in its place.
pub fn open_store(path: PathBuf) -> Result<EventStore> {
    match EventStore::load(&path) {
        Ok(store) => Ok(store),
        Err(e) if e.is_parse() => {
            warn!("{}", e);
            let backup = EventStore::move_aside(&path)?;
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
            eprintln!(
                "  {}",
                format!(
                    "Moved it to {} and started with an empty calendar.",
                    backup.display()
                )
                .dimmed()
            );

            let store = EventStore::empty(path);
            store.save()?;
            Ok(store)
        }
        Err(e) => Err(e.into()),
    }
}

/// Convert a 1-based event number from the command line to an index.
pub fn event_index(number: usize) -> Result<usize> {
    match number.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("Event numbers start at 1"),
    }
}
