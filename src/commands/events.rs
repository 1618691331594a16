use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use studycal_core::date_range::DateRange;
use studycal_core::{Category, EventStore, StoredEvent};

use crate::render::render_agenda;

pub fn run(
    store: &EventStore,
    range: &DateRange,
    category: Option<Category>,
    today: NaiveDate,
) -> Result<()> {
    let events = filter_by_category(store.events_between(range), category);

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    println!("{}", render_agenda(&events, today));

    Ok(())
}

/// Keep only events of `category`. Order and event numbers are unchanged.
fn filter_by_category(
    mut events: Vec<StoredEvent<'_>>,
    category: Option<Category>,
) -> Vec<StoredEvent<'_>> {
    if let Some(category) = category {
        events.retain(|stored| stored.event.category() == category);
    }
    events
}
