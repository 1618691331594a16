use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use studycal_core::month_grid::{self, MonthGrid};
use studycal_core::{EventStore, StudycalError};

use crate::render::{render_agenda, render_month};

/// Which month to show, relative to the requested one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Step {
    #[default]
    Stay,
    Previous,
    Next,
}

/// Resolve the (year, month) to display. Missing parts default to `today`.
pub fn resolve(
    year: Option<i32>,
    month: Option<u32>,
    step: Step,
    today: NaiveDate,
) -> Result<(i32, u32), StudycalError> {
    let year = year.unwrap_or(today.year());
    let month = month.unwrap_or(today.month());

    // Validate before stepping so that e.g. month 13 isn't silently rolled over
    month_grid::first_of_month(year, month)?;

    Ok(match step {
        Step::Stay => (year, month),
        Step::Previous => month_grid::previous_month(year, month),
        Step::Next => month_grid::next_month(year, month),
    })
}

pub fn run(store: &EventStore, grid: &MonthGrid, today: NaiveDate) -> Result<()> {
    println!("{}", render_month(grid, &store.counts(), today));

    let events = store.events_in_month(grid.year(), grid.month())?;
    if !events.is_empty() {
        println!();
        println!("{}", render_agenda(&events, today));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_defaults_to_current_month() {
        assert_eq!(resolve(None, None, Step::Stay, today()).unwrap(), (2024, 1));
        assert_eq!(resolve(Some(2020), None, Step::Stay, today()).unwrap(), (2020, 1));
    }

    #[test]
    fn test_steps_roll_over_years() {
        assert_eq!(resolve(None, None, Step::Previous, today()).unwrap(), (2023, 12));
        assert_eq!(resolve(Some(2024), Some(12), Step::Next, today()).unwrap(), (2025, 1));
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(matches!(
            resolve(Some(2024), Some(13), Step::Previous, today()),
            Err(StudycalError::InvalidArgument(_))
        ));
    }
}
