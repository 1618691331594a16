mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use commands::Session;
use commands::add::{CategoryArg, EventArgs};
use commands::month::Step;
use studycal_core::MonthGrid;
use studycal_core::date_range::{DateRange, parse_date};

#[derive(Parser)]
#[command(name = "studycal")]
#[command(about = "A student calendar: view months, add and remove events")]
#[command(version)]
struct Cli {
    /// Event file to use instead of the configured one
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month as a calendar grid with its events
    Month {
        /// Year (defaults to the current year)
        year: Option<i32>,

        /// Month number 1-12 (defaults to the current month)
        month: Option<u32>,

        /// Show the month before
        #[arg(long, conflicts_with = "next")]
        prev: bool,

        /// Show the month after
        #[arg(long, conflicts_with = "prev")]
        next: bool,
    },
    /// Add an event to a date
    Add {
        /// Date (YYYY-MM-DD, "today", "tomorrow")
        date: String,

        #[command(flatten)]
        event: EventArgs,
    },
    /// List the events on a date
    List {
        /// Date (YYYY-MM-DD, "today", "tomorrow"); defaults to today
        date: Option<String>,
    },
    /// List upcoming events grouped by day
    Events {
        /// Show events from this date (YYYY-MM-DD, or "start" for all past events)
        #[arg(long)]
        from: Option<String>,

        /// Show events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only show events of this category
        #[arg(short = 'k', long, value_enum)]
        category: Option<CategoryArg>,
    },
    /// Replace an event with new details
    Edit {
        /// Date of the event
        date: String,

        /// Event number as shown by `list`
        number: usize,

        #[command(flatten)]
        event: EventArgs,
    },
    /// Delete an event
    Delete {
        /// Date of the event
        date: String,

        /// Event number as shown by `list`
        number: usize,

        /// Delete without asking for confirmation
        #[arg(long)]
        force: bool,
    },
    /// Show configuration and file locations
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut session = Session::open(cli.file)?;
    let today = Local::now().date_naive();

    match cli.command.unwrap_or(Commands::Month {
        year: None,
        month: None,
        prev: false,
        next: false,
    }) {
        Commands::Month {
            year,
            month,
            prev,
            next,
        } => {
            let step = match (prev, next) {
                (true, _) => Step::Previous,
                (_, true) => Step::Next,
                _ => Step::Stay,
            };
            let (year, month) = commands::month::resolve(year, month, step, today)?;
            let grid =
                MonthGrid::with_week_start(year, month, session.config.week_start.weekday())?;
            commands::month::run(&session.store, &grid, today)
        }
        Commands::Add { date, event } => {
            commands::add::run(&mut session.store, parse_date(&date)?, event)
        }
        Commands::List { date } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => today,
            };
            commands::list::run(&session.store, date, today)
        }
        Commands::Events { from, to, category } => {
            let range = DateRange::from_args(from.as_deref(), to.as_deref())?;
            commands::events::run(&session.store, &range, category.map(Into::into), today)
        }
        Commands::Edit {
            date,
            number,
            event,
        } => commands::edit::run(&mut session.store, parse_date(&date)?, number, event),
        Commands::Delete {
            date,
            number,
            force,
        } => commands::delete::run(&mut session.store, parse_date(&date)?, number, force),
        Commands::Config => commands::config::run(&session.config, &session.store),
    }
}
