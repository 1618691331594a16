use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use studycal_core::{EventStore, StudycalError};

use crate::render::Render;

pub fn run(store: &mut EventStore, date: NaiveDate, number: usize, force: bool) -> Result<()> {
    let index = super::event_index(number)?;

    let Some(event) = store.list_events(date).get(index) else {
        return Err(StudycalError::OutOfRange {
            date: date.to_string(),
            index,
            len: store.list_events(date).len(),
        }
        .into());
    };

    println!("{}", date.to_string().bold());
    println!("  {} {}", "-".red(), event.render());

    // Confirm unless --force
    if !force {
        println!();
        let confirmed = Confirm::new()
            .with_prompt("Delete this event?")
            .default(false)
            .interact()?;

        if !confirmed {
            return Ok(());
        }
    }

    let removed = store.delete_event(date, index)?;
    println!("{}", format!("Deleted: {}", removed.title).red());

    Ok(())
}
