//! Shared test fixtures.
//!
//! Day 1 holds `keynote` (09:00), `android_1` (10:00) and `web_1` (11:00);
//! day 2 holds `android_2`. `offday` starts between the two days and belongs
//! to neither. Catalog order is deliberately not chronological.

use chrono::{DateTime, Duration};
use confsched_core::model::{ConferenceData, ConferenceDay, Room, Session, Tag, TagCategory};
use std::collections::BTreeSet;

pub(crate) fn at(instant: &str) -> DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339(instant).unwrap()
}

pub(crate) fn conference_days() -> Vec<ConferenceDay> {
    vec![
        ConferenceDay::new(at("2019-03-11T00:00:00+05:30"), at("2019-03-12T00:00:00+05:30")),
        ConferenceDay::new(at("2019-03-13T00:00:00+05:30"), at("2019-03-14T00:00:00+05:30")),
    ]
}

pub(crate) fn tag(id: &str, category: TagCategory, tag_name: &str, order: i32) -> Tag {
    Tag {
        id: id.to_string(),
        category,
        tag_name: tag_name.to_string(),
        order_in_category: order,
        display_name: id.to_string(),
        color: None,
    }
}

pub(crate) fn android() -> Tag {
    tag("android", TagCategory::Topic, "topic_android", 0)
}

pub(crate) fn web() -> Tag {
    tag("web", TagCategory::Topic, "topic_web", 1)
}

pub(crate) fn codelabs() -> Tag {
    tag("codelabs", TagCategory::Type, "type_codelabs", 0)
}

pub(crate) fn sessions_type() -> Tag {
    tag("sessions", TagCategory::Type, "type_sessions", 1)
}

pub(crate) fn keynotes() -> Tag {
    tag("keynotes", TagCategory::Type, "type_keynotes", 2)
}

pub(crate) fn hall() -> Room {
    Room {
        id: "hall".to_string(),
        name: "Main Hall".to_string(),
        capacity: Some(1),
    }
}

pub(crate) fn session(id: &str, start: &str, minutes: i64, tags: Vec<Tag>) -> Session {
    let start_time = at(start);
    Session {
        id: id.to_string(),
        title: format!("Session {id}"),
        description: String::new(),
        start_time,
        end_time: start_time + Duration::minutes(minutes),
        room: Some(hall()),
        tags,
        speakers: Vec::new(),
        related_sessions: BTreeSet::new(),
        photo_url: None,
        youtube_url: None,
        session_url: None,
        is_livestream: false,
    }
}

pub(crate) fn catalog() -> ConferenceData {
    ConferenceData {
        sessions: vec![
            session(
                "android_1",
                "2019-03-11T10:00:00+05:30",
                60,
                vec![android(), codelabs()],
            ),
            session(
                "web_1",
                "2019-03-11T11:00:00+05:30",
                60,
                vec![web(), sessions_type()],
            ),
            session(
                "android_2",
                "2019-03-13T10:00:00+05:30",
                60,
                vec![android(), sessions_type()],
            ),
            session("keynote", "2019-03-11T09:00:00+05:30", 45, vec![keynotes()]),
            session("offday", "2019-03-12T10:00:00+05:30", 30, vec![]),
        ],
        tags: vec![android(), web(), codelabs(), sessions_type(), keynotes()],
        speakers: Vec::new(),
        rooms: vec![hall()],
        version: 1,
    }
}
