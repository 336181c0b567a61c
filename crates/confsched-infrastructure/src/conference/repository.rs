//! The catalog cache.

use async_trait::async_trait;
use confsched_core::model::{ConferenceData, ConferenceDay};
use confsched_core::observable::{MutableObservable, Observable};
use confsched_core::repository::{ConferenceDataRepository, ConferenceDataSource};
use confsched_core::sync::lock;
use confsched_core::{DataResult, Result, ScheduleError, TaskScheduler};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Holds the current catalog snapshot and publishes it.
///
/// Offline lookup order is the in-memory cache, then the remote source's
/// offline copy, then the bootstrap source. A refresh replaces the cache
/// with the remote snapshot and bumps the version so observers can tell
/// snapshots apart even when the publisher reuses a version number.
pub struct DefaultConferenceDataRepository {
    state: Arc<CatalogState>,
    scheduler: TaskScheduler,
}

struct CatalogState {
    remote: Arc<dyn ConferenceDataSource>,
    bootstrap: Arc<dyn ConferenceDataSource>,
    days: Vec<ConferenceDay>,
    cache: Mutex<Option<Arc<ConferenceData>>>,
    data: MutableObservable<DataResult<Arc<ConferenceData>>>,
    load_started: AtomicBool,
}

impl DefaultConferenceDataRepository {
    pub fn new(
        scheduler: TaskScheduler,
        remote: Arc<dyn ConferenceDataSource>,
        bootstrap: Arc<dyn ConferenceDataSource>,
        days: Vec<ConferenceDay>,
    ) -> Self {
        Self {
            state: Arc::new(CatalogState {
                remote,
                bootstrap,
                days,
                cache: Mutex::new(None),
                data: MutableObservable::new(),
                load_started: AtomicBool::new(false),
            }),
            scheduler,
        }
    }
}

impl CatalogState {
    fn cached(&self) -> Option<Arc<ConferenceData>> {
        lock(&self.cache).clone()
    }

    fn store(&self, data: ConferenceData) -> Arc<ConferenceData> {
        let data = Arc::new(data);
        *lock(&self.cache) = Some(Arc::clone(&data));
        self.data.post(DataResult::Success(Arc::clone(&data)));
        data
    }

    async fn load_offline(&self) -> Result<Arc<ConferenceData>> {
        self.load_started.store(true, Ordering::SeqCst);
        if let Some(cached) = self.cached() {
            return Ok(cached);
        }

        let offline = match self.remote.get_offline_conference_data().await {
            Ok(Some(data)) => Some(data),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Remote offline copy unavailable, falling back to bootstrap");
                None
            }
        };
        let data = match offline {
            Some(data) => data,
            None => self
                .bootstrap
                .get_offline_conference_data()
                .await?
                .ok_or_else(|| ScheduleError::data_access("No conference data available"))?,
        };

        debug!(version = data.version, sessions = data.sessions.len(), "Loaded offline catalog");
        // Another load may have won the race; keep its snapshot.
        if let Some(cached) = self.cached() {
            return Ok(cached);
        }
        Ok(self.store(data))
    }
}

#[async_trait]
impl ConferenceDataRepository for DefaultConferenceDataRepository {
    async fn get_offline_conference_data(&self) -> Result<Arc<ConferenceData>> {
        let result = self.state.load_offline().await;
        if let Err(e) = &result {
            self.state.data.post(DataResult::Error(e.clone()));
        }
        result
    }

    async fn refresh_cache_with_remote_conference_data(&self) -> Result<()> {
        let result = match self.state.remote.get_remote_conference_data().await {
            Ok(Some(mut data)) => {
                data.version = self.current_version().max(data.version) + 1;
                info!(version = data.version, sessions = data.sessions.len(), "Catalog refreshed");
                self.state.store(data);
                Ok(())
            }
            Ok(None) => Err(ScheduleError::data_access(
                "Remote source returned no conference data",
            )),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!(error = %e, "Catalog refresh failed");
            self.state.data.post(DataResult::Error(e.clone()));
        }
        result
    }

    fn observe_data(&self) -> Observable<DataResult<Arc<ConferenceData>>> {
        let observable = self.state.data.observe();
        if !self.state.load_started.swap(true, Ordering::SeqCst) {
            let state = Arc::clone(&self.state);
            self.scheduler.spawn(async move {
                if let Err(e) = state.load_offline().await {
                    warn!(error = %e, "Initial catalog load failed");
                    state.data.post(DataResult::Error(e));
                }
            });
        }
        observable
    }

    fn conference_days(&self) -> Vec<ConferenceDay> {
        self.state.days.clone()
    }

    fn current_version(&self) -> i64 {
        self.state.cached().map(|data| data.version).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conference::StaticConferenceDataSource;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    fn catalog(version: i64, title: &str) -> ConferenceData {
        let data: crate::dto::ConferenceDataDocument = serde_json::from_value(serde_json::json!({
            "version": version,
            "sessions": [{
                "id": "s1", "title": title,
                "startTime": "2019-03-11T10:00:00+05:30",
                "endTime": "2019-03-11T11:00:00+05:30"
            }]
        }))
        .unwrap();
        data.into_domain()
    }

    struct FailingSource;

    #[async_trait]
    impl ConferenceDataSource for FailingSource {
        async fn get_remote_conference_data(&self) -> Result<Option<ConferenceData>> {
            Err(ScheduleError::transport("offline"))
        }

        async fn get_offline_conference_data(&self) -> Result<Option<ConferenceData>> {
            Err(ScheduleError::transport("offline"))
        }
    }

    fn repository(
        remote: Arc<dyn ConferenceDataSource>,
        bootstrap: Option<ConferenceData>,
    ) -> DefaultConferenceDataRepository {
        DefaultConferenceDataRepository::new(
            TaskScheduler::current().unwrap(),
            remote,
            Arc::new(StaticConferenceDataSource::new(bootstrap)),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn test_offline_prefers_remote_copy_over_bootstrap() {
        let remote = Arc::new(StaticConferenceDataSource::new(Some(catalog(5, "remote"))));
        let repo = repository(remote, Some(catalog(1, "bootstrap")));

        let data = repo.get_offline_conference_data().await.unwrap();
        assert_eq!(data.sessions[0].title, "remote");
        assert_eq!(repo.current_version(), 5);
    }

    #[tokio::test]
    async fn test_offline_falls_back_to_bootstrap_when_remote_fails() {
        let repo = repository(Arc::new(FailingSource), Some(catalog(1, "bootstrap")));
        let data = repo.get_offline_conference_data().await.unwrap();
        assert_eq!(data.sessions[0].title, "bootstrap");
    }

    #[tokio::test]
    async fn test_no_catalog_anywhere_is_data_access_error() {
        let repo = repository(Arc::new(StaticConferenceDataSource::default()), None);
        let err = repo.get_offline_conference_data().await.unwrap_err();
        assert!(matches!(err, ScheduleError::DataAccess(_)));
    }

    #[tokio::test]
    async fn test_observe_triggers_initial_load() {
        let repo = repository(
            Arc::new(StaticConferenceDataSource::default()),
            Some(catalog(1, "bootstrap")),
        );
        let mut observable = repo.observe_data();
        let value = timeout(WAIT, observable.wait_for(|r| r.is_success()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(value.success().unwrap().sessions[0].title, "bootstrap");
    }

    #[tokio::test]
    async fn test_refresh_bumps_version_and_publishes() {
        let remote = Arc::new(
            StaticConferenceDataSource::new(None).with_remote(catalog(1, "fresh")),
        );
        let repo = repository(remote, Some(catalog(1, "bootstrap")));
        repo.get_offline_conference_data().await.unwrap();
        let mut observable = repo.observe_data();

        repo.refresh_cache_with_remote_conference_data().await.unwrap();
        assert_eq!(repo.current_version(), 2);
        let value = timeout(
            WAIT,
            observable.wait_for(|r| r.success().is_some_and(|d| d.version == 2)),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(value.success().unwrap().sessions[0].title, "fresh");
    }

    #[tokio::test]
    async fn test_refresh_without_remote_data_publishes_error() {
        let repo = repository(
            Arc::new(StaticConferenceDataSource::default()),
            Some(catalog(1, "bootstrap")),
        );
        repo.get_offline_conference_data().await.unwrap();

        let err = repo
            .refresh_cache_with_remote_conference_data()
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::DataAccess(_)));
        assert!(repo.observe_data().value().unwrap().is_error());
        // The cache still answers offline reads.
        assert_eq!(repo.current_version(), 1);
    }
}
