//! Core types for studycal.
//!
//! This crate provides everything the CLI needs that isn't presentation:
//! - `month_grid` for laying out a month as weeks of days
//! - `event` and `store` for date-keyed events persisted to a JSON file
//! - `config` for locating the event file and choosing the first weekday

pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod month_grid;
pub mod store;

pub use error::{StudycalError, StudycalResult};
pub use event::{Category, Event, EventKind};
pub use month_grid::MonthGrid;
pub use store::{EventStore, StoredEvent};
