use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use studycal_core::EventStore;

use super::add::EventArgs;
use crate::render::Render;

/// Replace event `number` (1-based) on `date` with a new one built from `args`.
pub fn run(store: &mut EventStore, date: NaiveDate, number: usize, args: EventArgs) -> Result<()> {
    let index = super::event_index(number)?;
    let event = args.into_event(date)?;
    let old = store.edit_event(date, index, event)?;

    println!("{}", format!("Updated #{} on {}:", number, date).yellow());
    println!("  {} {}", "-".red(), old.render());
    println!("  {} {}", "+".green(), store.list_events(date)[index].render());

    Ok(())
}
