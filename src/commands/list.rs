use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use studycal_core::{EventStore, StoredEvent};

use crate::render::{Render, date_label};

pub fn run(store: &EventStore, date: NaiveDate, today: NaiveDate) -> Result<()> {
    let events = store.list_events(date);

    println!("{} {}", date_label(date, today).bold(), date.to_string().dimmed());

    if events.is_empty() {
        println!("  {}", "No events".dimmed());
        return Ok(());
    }

    for (index, event) in events.iter().enumerate() {
        let stored = StoredEvent { date, index, event };
        println!("  {}", stored.render());
    }

    Ok(())
}
