//! Calendar event types.
//!
//! An event is a short titled note pinned to a single date. Besides plain
//! events there are three student-specific categories, each carrying its own
//! time fields. All clock times are whole minutes, matching the "HH:MM"
//! stored on disk.

use std::fmt;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{StudycalError, StudycalResult};

/// Format used for every clock time (input, display and on disk).
pub const TIME_FORMAT: &str = "%H:%M";

/// A calendar event attached to one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub title: String,
    pub note: Option<String>,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Category of an event together with its category-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category")]
pub enum EventKind {
    General,
    /// Homework or coursework due at `time`. The note holds its description.
    Assignment {
        #[serde(with = "hhmm")]
        time: NaiveTime,
    },
    /// A class slot in the timetable.
    Timetable {
        #[serde(with = "hhmm")]
        start: NaiveTime,
        #[serde(with = "hhmm")]
        end: NaiveTime,
    },
    /// A group session with other people.
    Collab {
        #[serde(with = "hhmm")]
        time: NaiveTime,
        #[serde(default)]
        participants: Vec<String>,
    },
}

/// Fieldless mirror of [`EventKind`], used to filter listings and pick colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Assignment,
    Timetable,
    Collab,
}

impl Event {
    /// Build a validated event.
    ///
    /// The title is trimmed and must consist of letters and spaces only. A
    /// blank note is stored as `None`.
    pub fn new(
        date: NaiveDate,
        title: &str,
        note: Option<String>,
        kind: EventKind,
    ) -> StudycalResult<Self> {
        let title = validate_title(title)?;
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        kind.validate()?;

        if matches!(kind, EventKind::Assignment { .. }) && note.is_none() {
            return Err(StudycalError::InvalidArgument(
                "Assignment description cannot be empty".into(),
            ));
        }

        Ok(Event {
            date,
            title,
            note,
            kind,
        })
    }

    /// A plain event with no category-specific fields.
    pub fn general(date: NaiveDate, title: &str, note: Option<String>) -> StudycalResult<Self> {
        Self::new(date, title, note, EventKind::General)
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Time portion for display, e.g. "14:00" or "09:00-10:30".
    pub fn time_label(&self) -> Option<String> {
        match &self.kind {
            EventKind::General => None,
            EventKind::Assignment { time } | EventKind::Collab { time, .. } => {
                Some(time.format(TIME_FORMAT).to_string())
            }
            EventKind::Timetable { start, end } => Some(format!(
                "{}-{}",
                start.format(TIME_FORMAT),
                end.format(TIME_FORMAT)
            )),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(time) = self.time_label() {
            write!(f, "{} ", time)?;
        }
        write!(f, "{}", self.title)?;

        match &self.kind {
            EventKind::Collab { participants, .. } if !participants.is_empty() => {
                write!(f, " [{}]", participants.join(", "))?;
            }
            _ => {}
        }

        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }

        Ok(())
    }
}

impl EventKind {
    pub fn category(&self) -> Category {
        match self {
            EventKind::General => Category::General,
            EventKind::Assignment { .. } => Category::Assignment,
            EventKind::Timetable { .. } => Category::Timetable,
            EventKind::Collab { .. } => Category::Collab,
        }
    }

    /// Check times are whole minutes, timetable slots run forwards and
    /// participant names are plausible.
    pub fn validate(&self) -> StudycalResult<()> {
        match self {
            EventKind::General => {}
            EventKind::Assignment { time } | EventKind::Collab { time, .. } => {
                validate_minutes(time)?
            }
            EventKind::Timetable { start, end } => {
                validate_minutes(start)?;
                validate_minutes(end)?;
            }
        }

        match self {
            EventKind::Timetable { start, end } if end <= start => {
                Err(StudycalError::InvalidArgument(
                    "End time must be later than start time".into(),
                ))
            }
            EventKind::Collab { participants, .. } => {
                participants.iter().try_for_each(|p| validate_participant(p))
            }
            _ => Ok(()),
        }
    }
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Assignment => "Assignment",
            Category::Timetable => "Timetable",
            Category::Collab => "Collab",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Input parsing and validation
// =============================================================================

/// Parse a 24-hour "HH:MM" clock time.
pub fn parse_time(input: &str) -> StudycalResult<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), TIME_FORMAT).map_err(|_| {
        StudycalError::InvalidArgument(format!("Invalid time '{}'. Use HH:MM", input))
    })
}

/// Split a comma-separated participant list, dropping empty entries.
pub fn parse_participants(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn validate_title(title: &str) -> StudycalResult<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(StudycalError::InvalidArgument("Title cannot be empty".into()));
    }

    if title.chars().any(|c| !(c.is_alphabetic() || c == ' ')) {
        return Err(StudycalError::InvalidArgument(format!(
            "Title '{}' cannot contain numbers or symbols",
            title
        )));
    }

    Ok(title.to_string())
}

fn validate_minutes(time: &NaiveTime) -> StudycalResult<()> {
    if time.second() != 0 || time.nanosecond() != 0 {
        return Err(StudycalError::InvalidArgument(format!(
            "Time {} must be a whole minute",
            time
        )));
    }
    Ok(())
}

fn validate_participant(name: &str) -> StudycalResult<()> {
    if name.trim().is_empty() || name.chars().any(|c| c.is_ascii_digit()) {
        return Err(StudycalError::InvalidArgument(format!(
            "Invalid participant name '{}'",
            name
        )));
    }
    Ok(())
}

/// Serde adapter storing a `NaiveTime` as "HH:MM".
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
