//! Catalog document DTOs and domain conversion.
//!
//! Sessions refer to rooms, tags and speakers by id. Conversion resolves
//! those ids; a reference to an unknown id is dropped with a warning so a
//! single bad entry never hides the rest of the catalog.

use chrono::{DateTime, FixedOffset};
use confsched_core::model::{ConferenceData, Room, Session, Speaker, Tag, TagCategory};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// The published catalog document (JSON).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceDataDocument {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub sessions: Vec<SessionDto>,
    #[serde(default)]
    pub speakers: Vec<SpeakerDto>,
    #[serde(default)]
    pub rooms: Vec<RoomDto>,
    #[serde(default)]
    pub tags: Vec<TagDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub speakers: Vec<String>,
    #[serde(default)]
    pub related_sessions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub is_livestream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagDto {
    pub id: String,
    pub category: TagCategory,
    pub tag_name: String,
    #[serde(default)]
    pub order_in_category: i32,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl From<SpeakerDto> for Speaker {
    fn from(dto: SpeakerDto) -> Self {
        Speaker {
            id: dto.id,
            name: dto.name,
            bio: dto.bio,
            company: dto.company,
            image_url: dto.thumbnail_url,
        }
    }
}

impl From<RoomDto> for Room {
    fn from(dto: RoomDto) -> Self {
        Room {
            id: dto.id,
            name: dto.name,
            capacity: dto.capacity,
        }
    }
}

impl From<TagDto> for Tag {
    fn from(dto: TagDto) -> Self {
        Tag {
            id: dto.id,
            category: dto.category,
            tag_name: dto.tag_name,
            order_in_category: dto.order_in_category,
            display_name: dto.display_name,
            color: dto.color,
        }
    }
}

impl ConferenceDataDocument {
    /// Resolves references and builds the domain snapshot.
    pub fn into_domain(self) -> ConferenceData {
        let speakers: Vec<Speaker> = self.speakers.into_iter().map(Speaker::from).collect();
        let rooms: Vec<Room> = self.rooms.into_iter().map(Room::from).collect();
        let tags: Vec<Tag> = self.tags.into_iter().map(Tag::from).collect();

        let speakers_by_id: HashMap<&str, &Speaker> =
            speakers.iter().map(|s| (s.id.as_str(), s)).collect();
        let rooms_by_id: HashMap<&str, &Room> = rooms.iter().map(|r| (r.id.as_str(), r)).collect();
        let tags_by_id: HashMap<&str, &Tag> = tags.iter().map(|t| (t.id.as_str(), t)).collect();
        let session_ids: BTreeSet<&str> = self.sessions.iter().map(|s| s.id.as_str()).collect();

        let mut sessions = Vec::with_capacity(self.sessions.len());
        for dto in &self.sessions {
            let room = dto.room.as_deref().and_then(|room_id| {
                let room = rooms_by_id.get(room_id).map(|r| (*r).clone());
                if room.is_none() {
                    warn!(session = %dto.id, room = room_id, "Dropping unknown room reference");
                }
                room
            });
            let session_tags = resolve(&dto.id, "tag", &dto.tags, &tags_by_id);
            let session_speakers = resolve(&dto.id, "speaker", &dto.speakers, &speakers_by_id);
            let related_sessions = dto
                .related_sessions
                .iter()
                .filter(|id| {
                    let known = session_ids.contains(id.as_str());
                    if !known {
                        warn!(session = %dto.id, related = %id, "Dropping unknown related session");
                    }
                    known
                })
                .cloned()
                .collect();

            sessions.push(Session {
                id: dto.id.clone(),
                title: dto.title.clone(),
                description: dto.description.clone(),
                start_time: dto.start_time,
                end_time: dto.end_time,
                room,
                tags: session_tags,
                speakers: session_speakers,
                related_sessions,
                photo_url: dto.photo_url.clone(),
                youtube_url: dto.youtube_url.clone(),
                session_url: dto.url.clone(),
                is_livestream: dto.is_livestream,
            });
        }

        ConferenceData {
            sessions,
            tags,
            speakers,
            rooms,
            version: self.version,
        }
    }
}

fn resolve<T: Clone>(
    session_id: &str,
    kind: &str,
    ids: &[String],
    known: &HashMap<&str, &T>,
) -> Vec<T> {
    ids.iter()
        .filter_map(|id| {
            let found = known.get(id.as_str()).map(|item| (*item).clone());
            if found.is_none() {
                warn!(session = session_id, kind, id = %id, "Dropping unknown reference");
            }
            found
        })
        .collect()
}
