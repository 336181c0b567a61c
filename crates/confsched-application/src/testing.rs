//! Test fixtures: a small two-day catalog wired through the real repositories.

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Utc};
use confsched_core::model::{ConferenceData, ConferenceDay, Room, Session, Tag, TagCategory};
use confsched_core::repository::{ConferenceDataRepository, SessionAndUserEventRepository};
use confsched_core::time::FixedTimeProvider;
use confsched_core::{DataResult, TaskScheduler};
use confsched_infrastructure::{
    DefaultConferenceDataRepository, DefaultSessionAndUserEventRepository,
    DefaultSessionRepository, DefaultTagRepository, InMemoryPreferenceStorage,
    InMemoryReminderScheduler, InMemoryUserEventDataSource, StaticConferenceDataSource,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

pub(crate) const WAIT: Duration = Duration::from_secs(2);

pub(crate) fn at(instant: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(instant).unwrap()
}

pub(crate) fn utc(instant: &str) -> DateTime<Utc> {
    at(instant).with_timezone(&Utc)
}

pub(crate) fn conference_days() -> Vec<ConferenceDay> {
    vec![
        ConferenceDay::new(
            at("2019-03-11T00:00:00+05:30"),
            at("2019-03-12T00:00:00+05:30"),
        ),
        ConferenceDay::new(
            at("2019-03-13T00:00:00+05:30"),
            at("2019-03-14T00:00:00+05:30"),
        ),
    ]
}

pub(crate) fn tag(id: &str, category: TagCategory, order: i32) -> Tag {
    Tag {
        id: id.to_string(),
        category,
        tag_name: format!("{category}_{id}"),
        order_in_category: order,
        display_name: id.to_string(),
        color: None,
    }
}

/// Catalog tags, looked up by id.
pub(crate) fn tag_by_id(id: &str) -> Tag {
    catalog_tags()
        .into_iter()
        .find(|t| t.id == id)
        .unwrap_or_else(|| panic!("no tag {id}"))
}

fn catalog_tags() -> Vec<Tag> {
    vec![
        tag("web", TagCategory::Topic, 1),
        tag("android", TagCategory::Topic, 0),
        tag("sessions", TagCategory::Type, 1),
        tag("codelabs", TagCategory::Type, 0),
        tag("keynote", TagCategory::Type, 2),
        tag("beginner", TagCategory::Level, 0),
    ]
}

pub(crate) fn session(id: &str, start: &str, minutes: i64, tag_ids: &[&str]) -> Session {
    let start_time = at(start);
    Session {
        id: id.to_string(),
        title: format!("Session {id}"),
        description: String::new(),
        start_time,
        end_time: start_time + ChronoDuration::minutes(minutes),
        room: Some(Room {
            id: "hall".to_string(),
            name: "Main Hall".to_string(),
            capacity: Some(1),
        }),
        tags: tag_ids.iter().map(|id| tag_by_id(id)).collect(),
        speakers: Vec::new(),
        related_sessions: BTreeSet::new(),
        photo_url: None,
        youtube_url: None,
        session_url: None,
        is_livestream: false,
    }
}

/// Day 1: keynote 09:00, android_1 10:00, web_1 11:00. Day 2: android_2.
/// `offday` falls between the days.
pub(crate) fn catalog() -> ConferenceData {
    ConferenceData {
        sessions: vec![
            session(
                "android_1",
                "2019-03-11T10:00:00+05:30",
                60,
                &["android", "codelabs"],
            ),
            session("web_1", "2019-03-11T11:00:00+05:30", 60, &["web", "sessions"]),
            session(
                "android_2",
                "2019-03-13T10:00:00+05:30",
                60,
                &["android", "sessions"],
            ),
            session("keynote", "2019-03-11T09:00:00+05:30", 45, &["keynote"]),
            session("offday", "2019-03-12T10:00:00+05:30", 30, &[]),
        ],
        tags: catalog_tags(),
        speakers: Vec::new(),
        rooms: Vec::new(),
        version: 1,
    }
}

pub(crate) struct Fixture {
    pub scheduler: TaskScheduler,
    pub clock: Arc<FixedTimeProvider>,
    pub catalog_remote: Arc<StaticConferenceDataSource>,
    pub conference_data: Arc<DefaultConferenceDataRepository>,
    pub sessions: Arc<DefaultSessionRepository>,
    pub tags: Arc<DefaultTagRepository>,
    pub user_events: Arc<InMemoryUserEventDataSource>,
    pub user_sessions: Arc<DefaultSessionAndUserEventRepository>,
    pub preferences: Arc<InMemoryPreferenceStorage>,
    pub reminders: Arc<InMemoryReminderScheduler>,
}

impl Fixture {
    /// A week before the conference, with the catalog loaded.
    pub async fn new() -> Self {
        let scheduler = TaskScheduler::current().unwrap();
        let clock = Arc::new(FixedTimeProvider::new(utc("2019-03-01T00:00:00Z")));
        let catalog_remote = Arc::new(StaticConferenceDataSource::default());
        let conference_data = Arc::new(DefaultConferenceDataRepository::new(
            scheduler.clone(),
            catalog_remote.clone(),
            Arc::new(StaticConferenceDataSource::new(Some(catalog()))),
            conference_days(),
        ));
        conference_data.get_offline_conference_data().await.unwrap();

        let sessions = Arc::new(DefaultSessionRepository::new(conference_data.clone()));
        let tags = Arc::new(DefaultTagRepository::new(conference_data.clone()));
        let user_events = Arc::new(InMemoryUserEventDataSource::new(
            clock.clone(),
            ChronoDuration::minutes(60),
        ));
        let user_sessions = Arc::new(DefaultSessionAndUserEventRepository::new(
            scheduler.clone(),
            user_events.clone(),
            sessions.clone(),
            clock.clone(),
        ));

        Self {
            scheduler,
            clock,
            catalog_remote,
            conference_data,
            sessions,
            tags,
            user_events,
            user_sessions,
            preferences: Arc::new(InMemoryPreferenceStorage::default()),
            reminders: Arc::new(InMemoryReminderScheduler::new()),
        }
    }
}

/// Stars or unstars a session directly through the repository.
pub(crate) async fn star(fixture: &Fixture, user_id: &str, session_id: &str, starred: bool) {
    let user_session = fixture
        .user_sessions
        .get_user_session(Some(user_id), session_id)
        .await
        .unwrap();
    let mut result = fixture
        .user_sessions
        .star_event(user_id, &user_session, starred);
    let outcome = timeout(WAIT, result.wait_for(|r| !r.is_loading()))
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(outcome, DataResult::Success(_)));
}
