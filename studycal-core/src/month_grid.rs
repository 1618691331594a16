//! Month layout computation.
//!
//! A [`MonthGrid`] is the Gregorian layout of one month: a list of weeks, each
//! seven cells wide, where cells outside the month are blank.

use chrono::{Datelike, Month, NaiveDate, Weekday};

use crate::error::{StudycalError, StudycalResult};

/// One row of the grid. `None` cells pad the first and last week.
pub type Week = [Option<u32>; 7];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month: u32,
    week_start: Weekday,
    days_in_month: u32,
    weeks: Vec<Week>,
}

impl MonthGrid {
    /// Layout with weeks starting on Monday.
    pub fn new(year: i32, month: u32) -> StudycalResult<Self> {
        Self::with_week_start(year, month, Weekday::Mon)
    }

    pub fn with_week_start(year: i32, month: u32, week_start: Weekday) -> StudycalResult<Self> {
        let first = first_of_month(year, month)?;
        let days_in_month = days_in_month(year, month)?;

        let offset = column_of(first.weekday(), week_start);
        let mut weeks = Vec::new();
        let mut week: Week = [None; 7];
        let mut column = offset;

        for day in 1..=days_in_month {
            week[column] = Some(day);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }

        Ok(MonthGrid {
            year,
            month,
            week_start,
            days_in_month,
            weeks,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    /// Full English month name, e.g. "February".
    pub fn month_name(&self) -> &'static str {
        Month::try_from(self.month as u8)
            .map(|m| m.name())
            .unwrap_or("")
    }

    /// Weekday shown in each column, starting from the configured first day.
    pub fn weekdays(&self) -> [Weekday; 7] {
        let mut days = [self.week_start; 7];
        for i in 1..7 {
            days[i] = days[i - 1].succ();
        }
        days
    }

    /// Short column headers, e.g. ["Mon", "Tue", ...].
    pub fn weekday_labels(&self) -> [String; 7] {
        self.weekdays().map(|d| d.to_string())
    }

    /// Date of the cell at (week, column), if it falls inside the month.
    pub fn date_at(&self, week: usize, column: usize) -> Option<NaiveDate> {
        let day = (*self.weeks.get(week)?.get(column)?)?;
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> StudycalResult<u32> {
    let days = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return Err(invalid_month(month)),
    };
    Ok(days)
}

/// First day of the month, or `InvalidArgument` for an unusable year/month.
pub fn first_of_month(year: i32, month: u32) -> StudycalResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(invalid_month(month));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        StudycalError::InvalidArgument(format!("Year {} is out of the supported range", year))
    })
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Column index (0..7) of `day` in a week beginning on `week_start`.
fn column_of(day: Weekday, week_start: Weekday) -> usize {
    ((day.num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7) as usize
}

fn invalid_month(month: u32) -> StudycalError {
    StudycalError::InvalidArgument(format!("Month must be between 1 and 12, got {}", month))
}

// =============================================================================
// Tests
// =============================================================================
