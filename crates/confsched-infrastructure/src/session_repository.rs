//! Catalog-backed SessionRepository and TagRepository implementations.

use async_trait::async_trait;
use confsched_core::model::{ConferenceData, ConferenceDay, Session, Tag};
use confsched_core::observable::Observable;
use confsched_core::repository::{ConferenceDataRepository, SessionRepository, TagRepository};
use confsched_core::{DataResult, Result, ScheduleError};
use std::sync::Arc;

/// Reads sessions from the cached catalog snapshot.
pub struct DefaultSessionRepository {
    conference_data: Arc<dyn ConferenceDataRepository>,
}

impl DefaultSessionRepository {
    pub fn new(conference_data: Arc<dyn ConferenceDataRepository>) -> Self {
        Self { conference_data }
    }
}

#[async_trait]
impl SessionRepository for DefaultSessionRepository {
    async fn get_sessions(&self) -> Result<Vec<Session>> {
        Ok(self
            .conference_data
            .get_offline_conference_data()
            .await?
            .sessions
            .clone())
    }

    async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.conference_data
            .get_offline_conference_data()
            .await?
            .find_session(session_id)
            .cloned()
            .ok_or_else(|| ScheduleError::session_not_found(session_id))
    }

    async fn get_sessions_for_day(&self, day: &ConferenceDay) -> Result<Vec<Session>> {
        let data = self.conference_data.get_offline_conference_data().await?;
        Ok(data
            .sessions
            .iter()
            .filter(|session| day.contains(&session.start_time))
            .cloned()
            .collect())
    }

    fn get_conference_days(&self) -> Vec<ConferenceDay> {
        self.conference_data.conference_days()
    }

    fn observe_catalog(&self) -> Observable<DataResult<Arc<ConferenceData>>> {
        self.conference_data.observe_data()
    }
}

/// Reads tags from the cached catalog snapshot.
pub struct DefaultTagRepository {
    conference_data: Arc<dyn ConferenceDataRepository>,
}

impl DefaultTagRepository {
    pub fn new(conference_data: Arc<dyn ConferenceDataRepository>) -> Self {
        Self { conference_data }
    }
}

#[async_trait]
impl TagRepository for DefaultTagRepository {
    async fn get_tags(&self) -> Result<Vec<Tag>> {
        Ok(self
            .conference_data
            .get_offline_conference_data()
            .await?
            .tags
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conference::{DefaultConferenceDataRepository, StaticConferenceDataSource};
    use crate::testing::{catalog, conference_days};
    use confsched_core::TaskScheduler;

    fn repository() -> DefaultSessionRepository {
        let conference_data = DefaultConferenceDataRepository::new(
            TaskScheduler::current().unwrap(),
            Arc::new(StaticConferenceDataSource::default()),
            Arc::new(StaticConferenceDataSource::new(Some(catalog()))),
            conference_days(),
        );
        DefaultSessionRepository::new(Arc::new(conference_data))
    }

    #[tokio::test]
    async fn test_get_session_by_id() {
        let repo = repository();
        assert_eq!(repo.get_session("android_1").await.unwrap().id, "android_1");
        let err = repo.get_session("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_sessions_for_day_uses_day_window() {
        let repo = repository();
        let days = repo.get_conference_days();
        let first: Vec<_> = repo
            .get_sessions_for_day(&days[0])
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(first, vec!["android_1", "web_1", "keynote"]);
        let second = repo.get_sessions_for_day(&days[1]).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "android_2");
    }
}
