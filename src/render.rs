//! TUI rendering for studycal types.
//!
//! Extension traits that add colored terminal output to studycal-core types
//! using owo_colors.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use owo_colors::OwoColorize;
use studycal_core::{Category, Event, MonthGrid, StoredEvent};

/// Width of one day cell in the month grid, including its event marker.
const CELL_WIDTH: usize = 5;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Category {
    fn render(&self) -> String {
        let label = format!("[{}]", self);
        match self {
            Category::General => label.dimmed().to_string(),
            Category::Assignment => label.truecolor(0xd6, 0x8a, 0x8a).to_string(),
            Category::Timetable => label.truecolor(0x6c, 0xb2, 0x87).to_string(),
            Category::Collab => label.truecolor(0x4e, 0xb5, 0xf0).to_string(),
        }
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let time = self
            .time_label()
            .map(|t| format!("{:>11}", t))
            .unwrap_or_else(|| format!("{:>11}", "all-day"));

        format!("{} {} {}", time.dimmed(), self, self.category().render())
    }
}

impl Render for StoredEvent<'_> {
    fn render(&self) -> String {
        format!("{} {}", format!("#{}", self.index + 1).bold(), self.event.render())
    }
}

/// Render a month as a grid, marking days that have events.
pub fn render_month(grid: &MonthGrid, counts: &BTreeMap<NaiveDate, usize>, today: NaiveDate) -> String {
    let width = CELL_WIDTH * 7;
    let mut lines = Vec::new();

    let title = format!("{} {}", grid.month_name(), grid.year());
    lines.push(format!("{:^width$}", title, width = width).bold().to_string());

    let header: String = grid
        .weekday_labels()
        .iter()
        .zip(grid.weekdays())
        .map(|(label, day)| {
            let label = format!("{:>3}  ", label);
            if is_weekend(day) {
                label.blue().to_string()
            } else {
                label
            }
        })
        .collect();
    lines.push(header.dimmed().to_string());

    for (w, week) in grid.weeks().iter().enumerate() {
        let mut line = String::new();
        for (column, day) in week.iter().enumerate() {
            let Some(day) = day else {
                line.push_str(&" ".repeat(CELL_WIDTH));
                continue;
            };

            let date = grid.date_at(w, column);
            let marker = match date.and_then(|d| counts.get(&d)) {
                Some(1) => "• ",
                Some(_) => "••",
                None => "  ",
            };
            let number = format!("{:>3}", day);

            let number = if date == Some(today) {
                number.black().on_green().to_string()
            } else if is_weekend(grid.weekdays()[column]) {
                number.blue().to_string()
            } else {
                number
            };
            line.push_str(&number);
            line.push_str(&marker.yellow().to_string());
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Render events grouped under a heading per date.
pub fn render_agenda(events: &[StoredEvent<'_>], today: NaiveDate) -> String {
    let mut lines = Vec::new();
    let mut current: Option<NaiveDate> = None;

    for stored in events {
        if current != Some(stored.date) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(date_label(stored.date, today).bold().to_string());
            current = Some(stored.date);
        }
        lines.push(format!("  {}", stored.render()));
    }

    lines.join("\n")
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25 2026")
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ if date.year() == today.year() => date.format("%a %b %-d").to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_date_label() {
        let today = d(2026, 2, 24);
        assert_eq!(date_label(today, today), "Today");
        assert_eq!(date_label(d(2026, 2, 25), today), "Tomorrow");
        assert_eq!(date_label(d(2026, 2, 23), today), "Yesterday");
        assert_eq!(date_label(d(2026, 3, 4), today), "Wed Mar 4");
        assert_eq!(date_label(d(2027, 3, 4), today), "Thu Mar 4 2027");
    }

    #[test]
    fn test_month_has_header_and_week_rows() {
        let grid = MonthGrid::new(2024, 2).unwrap();
        let mut counts = BTreeMap::new();
        counts.insert(d(2024, 2, 29), 2);

        let out = render_month(&grid, &counts, d(2024, 3, 15));
        let lines: Vec<_> = out.lines().collect();

        // title, weekday header, five weeks
        assert_eq!(lines.len(), 7);
        assert!(lines[0].contains("February 2024"));
        assert!(lines[1].contains("Mon"));
        assert!(lines[6].contains("29"));
        assert!(lines[6].contains("••"));
    }

    #[test]
    fn test_header_follows_week_start() {
        let grid = MonthGrid::with_week_start(2024, 9, Weekday::Sun).unwrap();
        let out = render_month(&grid, &BTreeMap::new(), d(2024, 10, 1));
        let header = out.lines().nth(1).unwrap();

        assert!(header.find("Sun").unwrap() < header.find("Mon").unwrap());
        assert!(header.find("Fri").unwrap() < header.find("Sat").unwrap());
    }
}
