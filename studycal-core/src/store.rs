//! Event storage.
//!
//! All events live in memory in a date-ordered map and are written back to a
//! single JSON file after every mutation. The file is an object keyed by ISO
//! date, each value an array of event records in insertion order.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::date_range::DateRange;
use crate::error::{StudycalError, StudycalResult};
use crate::event::Event;
use crate::month_grid;

/// An event together with its position in the day's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredEvent<'a> {
    pub date: NaiveDate,
    pub index: usize,
    pub event: &'a Event,
}

#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
    events: BTreeMap<NaiveDate, Vec<Event>>,
}

impl EventStore {
    /// A store with no events that will be saved to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        EventStore {
            path: path.into(),
            events: BTreeMap::new(),
        }
    }

    /// Load events from `path`. A missing file gives an empty store.
    pub fn load(path: impl Into<PathBuf>) -> StudycalResult<Self> {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No event file at {}, starting empty", path.display());
                return Ok(Self::empty(path));
            }
            Err(e) => return Err(e.into()),
        };

        let mut events: BTreeMap<NaiveDate, Vec<Event>> =
            serde_json::from_str(&content).map_err(|e| parse_error(&path, e.to_string()))?;

        for (date, day) in &events {
            for event in day {
                if event.date != *date {
                    return Err(parse_error(
                        &path,
                        format!(
                            "event '{}' dated {} is filed under {}",
                            event.title, event.date, date
                        ),
                    ));
                }
                event.kind.validate().map_err(|e| {
                    parse_error(&path, format!("event '{}' on {}: {}", event.title, date, e))
                })?;
            }
        }
        events.retain(|_, day| !day.is_empty());

        debug!(
            "Loaded {} events on {} dates from {}",
            events.values().map(Vec::len).sum::<usize>(),
            events.len(),
            path.display()
        );

        Ok(EventStore { path, events })
    }

    /// Move an unreadable event file out of the way so a fresh one can be
    /// written. Returns the backup path.
    pub fn move_aside(path: &Path) -> StudycalResult<PathBuf> {
        let mut backup = path.as_os_str().to_owned();
        backup.push(".bak");
        let backup = PathBuf::from(backup);

        std::fs::rename(path, &backup)?;
        warn!("Moved unreadable event file to {}", backup.display());
        Ok(backup)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the whole store to its file, replacing the previous contents.
    pub fn save(&self) -> StudycalResult<()> {
        let content = serde_json::to_string_pretty(&self.events)
            .map_err(|e| StudycalError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.write_all(b"\n")?;

        // Temp files are created owner-only; keep the mode of the file being replaced
        if let Ok(existing) = std::fs::metadata(&self.path) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Saved {} dates to {}", self.events.len(), self.path.display());
        Ok(())
    }

    // =========================================================================
    // Event operations
    // =========================================================================

    /// Append an event to its date and persist. Returns the event's index.
    pub fn add_event(&mut self, event: Event) -> StudycalResult<usize> {
        let day = self.events.entry(event.date).or_default();
        day.push(event);
        let index = day.len() - 1;

        self.save()?;
        Ok(index)
    }

    /// Events on `date` in insertion order.
    pub fn list_events(&self, date: NaiveDate) -> &[Event] {
        self.events.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove the event at `index` on `date` and persist.
    pub fn delete_event(&mut self, date: NaiveDate, index: usize) -> StudycalResult<Event> {
        self.check_index(date, index)?;

        let day = self.events.entry(date).or_default();
        let removed = day.remove(index);
        if day.is_empty() {
            self.events.remove(&date);
        }

        self.save()?;
        Ok(removed)
    }

    /// Replace the event at `index` on `date` and persist. Returns the old event.
    pub fn edit_event(&mut self, date: NaiveDate, index: usize, event: Event) -> StudycalResult<Event> {
        if event.date != date {
            return Err(StudycalError::InvalidArgument(format!(
                "Edited event is dated {} but belongs to {}",
                event.date, date
            )));
        }
        self.check_index(date, index)?;

        let day = self.events.entry(date).or_default();
        let old = std::mem::replace(&mut day[index], event);

        self.save()?;
        Ok(old)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every event in the given month, ordered by date then position.
    pub fn events_in_month(&self, year: i32, month: u32) -> StudycalResult<Vec<StoredEvent<'_>>> {
        let first = month_grid::first_of_month(year, month)?;
        let last = NaiveDate::from_ymd_opt(year, month, month_grid::days_in_month(year, month)?)
            .unwrap_or(first);

        Ok(self.stored_events(first..=last))
    }

    /// Every event inside `range`, ordered by date then position.
    pub fn events_between(&self, range: &DateRange) -> Vec<StoredEvent<'_>> {
        if let (Some(from), Some(to)) = (range.from, range.to)
            && to < from
        {
            return Vec::new();
        }

        self.stored_events((
            range.from.map_or(std::ops::Bound::Unbounded, std::ops::Bound::Included),
            range.to.map_or(std::ops::Bound::Unbounded, std::ops::Bound::Included),
        ))
    }

    /// Number of events per date, for the dates that have any.
    pub fn counts(&self) -> BTreeMap<NaiveDate, usize> {
        self.events.iter().map(|(d, day)| (*d, day.len())).collect()
    }

    pub fn len(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn stored_events<R>(&self, range: R) -> Vec<StoredEvent<'_>>
    where
        R: std::ops::RangeBounds<NaiveDate>,
    {
        self.events
            .range(range)
            .flat_map(|(date, day)| {
                day.iter().enumerate().map(move |(index, event)| StoredEvent {
                    date: *date,
                    index,
                    event,
                })
            })
            .collect()
    }

    fn check_index(&self, date: NaiveDate, index: usize) -> StudycalResult<()> {
        let len = self.list_events(date).len();
        if index >= len {
            return Err(StudycalError::OutOfRange {
                date: date.to_string(),
                index,
                len,
            });
        }
        Ok(())
    }
}

fn parse_error(path: &Path, reason: String) -> StudycalError {
    StudycalError::Parse {
        path: path.display().to_string(),
        reason,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, parse_time};
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn store_in(dir: &TempDir) -> EventStore {
        EventStore::load(dir.path().join("events.json")).unwrap()
    }

    fn general(date: NaiveDate, title: &str) -> Event {
        Event::general(date, title, None).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
        assert!(store.list_events(d(2024, 1, 1)).is_empty());
        assert!(!dir.path().join("events.json").exists());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let date = d(2024, 2, 29);

        assert_eq!(store.add_event(general(date, "Lecture")).unwrap(), 0);
        assert_eq!(store.add_event(general(date, "Gym")).unwrap(), 1);

        let titles: Vec<_> = store.list_events(date).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Lecture", "Gym"]);

        let reloaded = store_in(&dir);
        let titles: Vec<_> = reloaded.list_events(date).iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Lecture", "Gym"]);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.add_event(general(d(2024, 3, 1), "Lecture")).unwrap();
        store
            .add_event(
                Event::new(
                    d(2024, 3, 1),
                    "Essay",
                    Some("History".into()),
                    EventKind::Assignment { time: parse_time("23:59").unwrap() },
                )
                .unwrap(),
            )
            .unwrap();
        store
            .add_event(
                Event::new(
                    d(2025, 1, 10),
                    "Project",
                    None,
                    EventKind::Collab {
                        time: parse_time("14:00").unwrap(),
                        participants: vec!["Ann".into(), "Bob".into()],
                    },
                )
                .unwrap(),
            )
            .unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.counts(), store.counts());
        for date in [d(2024, 3, 1), d(2025, 1, 10)] {
            assert_eq!(reloaded.list_events(date), store.list_events(date));
        }
    }

    #[test]
    fn test_deleting_only_event_leaves_empty_day() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let date = d(2024, 4, 2);

        store.add_event(general(date, "Lecture")).unwrap();
        let removed = store.delete_event(date, 0).unwrap();
        assert_eq!(removed.title, "Lecture");
        assert!(store.list_events(date).is_empty());

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(!content.contains("2024-04-02"));
        assert!(store_in(&dir).list_events(date).is_empty());
    }

    #[test]
    fn test_delete_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let date = d(2024, 4, 2);

        assert!(matches!(
            store.delete_event(date, 0),
            Err(StudycalError::OutOfRange { index: 0, len: 0, .. })
        ));

        store.add_event(general(date, "Lecture")).unwrap();
        assert!(matches!(
            store.delete_event(date, 1),
            Err(StudycalError::OutOfRange { index: 1, len: 1, .. })
        ));
        assert_eq!(store.list_events(date).len(), 1);
    }

    #[test]
    fn test_edit_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let date = d(2024, 4, 2);

        store.add_event(general(date, "Lecture")).unwrap();
        store.add_event(general(date, "Gym")).unwrap();

        let old = store.edit_event(date, 0, general(date, "Seminar")).unwrap();
        assert_eq!(old.title, "Lecture");
        assert_eq!(store_in(&dir).list_events(date)[0].title, "Seminar");
        assert_eq!(store_in(&dir).list_events(date)[1].title, "Gym");

        assert!(store.edit_event(date, 5, general(date, "Seminar")).is_err());
        assert!(matches!(
            store.edit_event(date, 0, general(d(2024, 4, 3), "Seminar")),
            Err(StudycalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = EventStore::load(&path).unwrap_err();
        assert!(err.is_parse());

        let backup = EventStore::move_aside(&path).unwrap();
        assert!(backup.exists());
        assert!(!path.exists());
        assert!(EventStore::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_date_key_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"{ "2024-01-01": [ { "date": "2024-01-02", "title": "Lecture", "note": null, "category": "General" } ] }"#,
        )
        .unwrap();

        assert!(EventStore::load(&path).unwrap_err().is_parse());
    }

    #[test]
    fn test_times_survive_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let date = d(2024, 9, 2);

        let slot = Event::new(
            date,
            "Maths",
            None,
            EventKind::Timetable {
                start: parse_time("09:00").unwrap(),
                end: parse_time("09:01").unwrap(),
            },
        )
        .unwrap();
        store.add_event(slot).unwrap();

        assert_eq!(store_in(&dir).list_events(date), store.list_events(date));
    }

    #[test]
    fn test_backwards_timetable_on_disk_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"{ "2024-01-01": [ { "date": "2024-01-01", "title": "Maths", "category": "Timetable", "start": "09:00", "end": "09:00" } ] }"#,
        )
        .unwrap();

        assert!(EventStore::load(&path).unwrap_err().is_parse());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_event(general(d(2024, 1, 1), "Lecture")).unwrap();

        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();
        store.add_event(general(d(2024, 1, 2), "Gym")).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_reads_hand_written_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        std::fs::write(
            &path,
            r#"{
  "2024-01-01": [
    { "date": "2024-01-01", "title": "Maths", "category": "Timetable", "start": "09:00", "end": "10:30" }
  ],
  "2024-01-05": []
}"#,
        )
        .unwrap();

        let store = EventStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list_events(d(2024, 1, 1))[0].note, None);
        assert!(store.counts().get(&d(2024, 1, 5)).is_none());
    }

    #[test]
    fn test_month_and_range_queries() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.add_event(general(d(2024, 1, 31), "Before")).unwrap();
        store.add_event(general(d(2024, 2, 1), "First")).unwrap();
        store.add_event(general(d(2024, 2, 29), "Leap")).unwrap();
        store.add_event(general(d(2024, 2, 29), "Second")).unwrap();
        store.add_event(general(d(2024, 3, 1), "After")).unwrap();

        let feb = store.events_in_month(2024, 2).unwrap();
        let titles: Vec<_> = feb.iter().map(|s| s.event.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Leap", "Second"]);
        assert_eq!(feb[2].index, 1);

        assert!(store.events_in_month(2024, 13).is_err());

        let range = DateRange {
            from: Some(d(2024, 2, 29)),
            to: None,
        };
        assert_eq!(store.events_between(&range).len(), 3);
        assert_eq!(store.events_between(&DateRange::default()).len(), 5);

        let backwards = DateRange {
            from: Some(d(2024, 3, 1)),
            to: Some(d(2024, 1, 1)),
        };
        assert!(store.events_between(&backwards).is_empty());
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("events.json");
        let mut store = EventStore::load(&path).unwrap();

        store.add_event(general(d(2024, 1, 1), "Lecture")).unwrap();
        assert!(path.exists());
    }
}
