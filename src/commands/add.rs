use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use owo_colors::OwoColorize;
use studycal_core::event::{EventKind, parse_participants, parse_time};
use studycal_core::{Category, Event, EventStore};

use crate::render::Render;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    #[default]
    General,
    Assignment,
    Timetable,
    Collab,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::General => Category::General,
            CategoryArg::Assignment => Category::Assignment,
            CategoryArg::Timetable => Category::Timetable,
            CategoryArg::Collab => Category::Collab,
        }
    }
}

/// Event fields shared by `add` and `edit`.
#[derive(Debug, Args)]
pub struct EventArgs {
    /// Event title (letters and spaces only)
    pub title: String,

    /// Free-text note (the description, for assignments)
    #[arg(short, long)]
    pub note: Option<String>,

    /// Kind of event
    #[arg(short = 'k', long, value_enum, default_value_t = CategoryArg::General)]
    pub category: CategoryArg,

    /// Due or meeting time, HH:MM (assignment, collab)
    #[arg(short, long)]
    pub time: Option<String>,

    /// Class start time, HH:MM (timetable)
    #[arg(long)]
    pub start: Option<String>,

    /// Class end time, HH:MM (timetable)
    #[arg(long)]
    pub end: Option<String>,

    /// Comma-separated participant names (collab)
    #[arg(short, long)]
    pub participants: Option<String>,
}

impl EventArgs {
    /// Validate the arguments and build an event on `date`.
    pub fn into_event(self, date: NaiveDate) -> Result<Event> {
        let kind = match self.category {
            CategoryArg::General => {
                reject_unused(
                    "general",
                    &[
                        ("--time", &self.time),
                        ("--start", &self.start),
                        ("--end", &self.end),
                        ("--participants", &self.participants),
                    ],
                )?;
                EventKind::General
            }
            CategoryArg::Assignment => {
                reject_unused(
                    "assignment",
                    &[
                        ("--start", &self.start),
                        ("--end", &self.end),
                        ("--participants", &self.participants),
                    ],
                )?;
                EventKind::Assignment {
                    time: parse_time(required("--time", &self.time)?)?,
                }
            }
            CategoryArg::Timetable => {
                reject_unused(
                    "timetable",
                    &[("--time", &self.time), ("--participants", &self.participants)],
                )?;
                EventKind::Timetable {
                    start: parse_time(required("--start", &self.start)?)?,
                    end: parse_time(required("--end", &self.end)?)?,
                }
            }
            CategoryArg::Collab => {
                reject_unused("collab", &[("--start", &self.start), ("--end", &self.end)])?;
                EventKind::Collab {
                    time: parse_time(required("--time", &self.time)?)?,
                    participants: self
                        .participants
                        .as_deref()
                        .map(parse_participants)
                        .unwrap_or_default(),
                }
            }
        };

        Ok(Event::new(date, &self.title, self.note, kind)?)
    }
}

fn required<'a>(flag: &str, value: &'a Option<String>) -> Result<&'a str> {
    match value {
        Some(v) => Ok(v),
        None => bail!("{} is required for this kind of event", flag),
    }
}

fn reject_unused(category: &str, flags: &[(&str, &Option<String>)]) -> Result<()> {
    if let Some((flag, _)) = flags.iter().find(|(_, v)| v.is_some()) {
        bail!("{} is not used by {} events", flag, category);
    }
    Ok(())
}

pub fn run(store: &mut EventStore, date: NaiveDate, args: EventArgs) -> Result<()> {
    let event = args.into_event(date)?;
    let index = store.add_event(event)?;

    let added = &store.list_events(date)[index];
    println!("{}", format!("Added #{} on {}:", index + 1, date).green());
    println!("  {}", added.render());

    Ok(())
}
