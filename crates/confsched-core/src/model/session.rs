//! Session domain model.
//!
//! Sessions, speakers and rooms are immutable catalog entities. They are
//! created when a catalog document is ingested and live as long as the
//! catalog snapshot that holds them.

use super::tag::{Tag, TagCategory};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type SessionId = String;
pub type SpeakerId = String;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    /// Number of reservable seats; `None` means reservations never waitlist.
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Speaker {
    pub id: SpeakerId,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// The kind of a session, derived from its type-category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionType {
    Keynote,
    Session,
    AppReview,
    OfficeHours,
    Codelab,
    Sandbox,
    AfterHours,
    Meal,
    Unknown,
}

impl SessionType {
    pub fn from_tag_name(tag_name: &str) -> Self {
        match tag_name {
            "type_keynotes" => Self::Keynote,
            "type_sessions" => Self::Session,
            "type_appreviews" => Self::AppReview,
            "type_officehours" => Self::OfficeHours,
            "type_codelabs" => Self::Codelab,
            "type_sandboxdemos" => Self::Sandbox,
            "type_afterhours" => Self::AfterHours,
            "type_meal" => Self::Meal,
            _ => Self::Unknown,
        }
    }

    /// Whether sessions of this type take seat reservations.
    pub fn is_reservable(&self) -> bool {
        matches!(self, Self::Session | Self::Codelab)
    }
}

/// A scheduled event of the conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique string identifying this session.
    pub id: SessionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub room: Option<Room>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default)]
    pub related_sessions: BTreeSet<SessionId>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub session_url: Option<String>,
    #[serde(default)]
    pub is_livestream: bool,
}

impl Session {
    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == tag_id)
    }

    pub fn tag_ids(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| tag.id.as_str())
    }

    pub fn speaker_ids(&self) -> impl Iterator<Item = &str> {
        self.speakers.iter().map(|speaker| speaker.id.as_str())
    }

    /// The session type, taken from the first type-category tag.
    pub fn session_type(&self) -> SessionType {
        self.tags
            .iter()
            .find(|tag| tag.category == TagCategory::Type)
            .map(|tag| SessionType::from_tag_name(&tag.tag_name))
            .unwrap_or(SessionType::Unknown)
    }

    pub fn has_video(&self) -> bool {
        self.youtube_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    pub fn has_photo_or_video(&self) -> bool {
        self.photo_url.as_deref().is_some_and(|url| !url.is_empty()) || self.has_video()
    }

    /// True if the two time ranges intersect. Back-to-back sessions do not.
    pub fn overlaps(&self, other: &Session) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }
}
