//! Date parsing and date ranges for filtering events.

use chrono::{Duration, Local, NaiveDate};

use crate::error::{StudycalError, StudycalResult};

/// Inclusive date range. None values mean unbounded in that direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Parse command line bounds relative to the local date.
    /// - `from`: "start" for unbounded, a date, or today when omitted
    /// - `to`: a date, or unbounded when omitted
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> StudycalResult<Self> {
        Self::from_args_at(Local::now().date_naive(), from, to)
    }

    pub fn from_args_at(today: NaiveDate, from: Option<&str>, to: Option<&str>) -> StudycalResult<Self> {
        let from = match from {
            Some("start") => None,
            Some(s) => Some(parse_date_at(today, s)?),
            None => Some(today),
        };

        let to = to.map(|s| parse_date_at(today, s)).transpose()?;

        if let (Some(f), Some(t)) = (from, to)
            && t < f
        {
            return Err(StudycalError::InvalidArgument(format!(
                "Range end {} is before its start {}",
                t, f
            )));
        }

        Ok(DateRange { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}

/// Parse YYYY-MM-DD, or one of "today", "tomorrow", "yesterday".
pub fn parse_date(input: &str) -> StudycalResult<NaiveDate> {
    parse_date_at(Local::now().date_naive(), input)
}

pub fn parse_date_at(today: NaiveDate, input: &str) -> StudycalResult<NaiveDate> {
    match input.trim().to_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        s => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            StudycalError::InvalidArgument(format!(
                "Invalid date format '{}'. Expected YYYY-MM-DD",
                input
            ))
        }),
    }
}
