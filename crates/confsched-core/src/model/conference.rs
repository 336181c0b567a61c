//! Catalog snapshot and conference days.

use super::session::{Room, Session, Speaker};
use super::tag::Tag;
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

/// One immutable version of the published catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConferenceData {
    pub sessions: Vec<Session>,
    pub tags: Vec<Tag>,
    pub speakers: Vec<Speaker>,
    pub rooms: Vec<Room>,
    pub version: i64,
}

impl ConferenceData {
    pub fn find_session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == session_id)
    }
}

/// A contiguous time window used to bucket sessions.
///
/// Days order by their start instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConferenceDay {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl ConferenceDay {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// True if `instant` lies in `[start, end)`.
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let instant = instant.fixed_offset();
        self.start <= instant && instant < self.end
    }

    /// Label such as `Mar 11` in the day's own offset.
    pub fn formatted_date(&self) -> String {
        self.start.format("%b %-d").to_string()
    }
}
