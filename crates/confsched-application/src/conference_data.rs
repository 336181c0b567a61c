use confsched_core::observable::{Mediator, Observable};
use confsched_core::repository::ConferenceDataRepository;
use confsched_core::{DataResult, Result, TaskScheduler};
use std::sync::Arc;
use tracing::{debug, warn};

/// Pulls a fresh catalog from the remote source into the cache.
pub struct RefreshConferenceDataUseCase {
    repository: Arc<dyn ConferenceDataRepository>,
}

impl RefreshConferenceDataUseCase {
    pub fn new(repository: Arc<dyn ConferenceDataRepository>) -> Self {
        Self { repository }
    }

    /// Returns the catalog version now in the cache.
    pub async fn execute(&self) -> Result<i64> {
        if let Err(e) = self
            .repository
            .refresh_cache_with_remote_conference_data()
            .await
        {
            warn!(error = %e, "Conference data refresh failed");
            return Err(e);
        }
        let version = self.repository.current_version();
        debug!(version, "Conference data version after refresh");
        Ok(version)
    }
}

/// Emits the catalog version each time the catalog changes.
pub struct ObserveConferenceDataUseCase {
    repository: Arc<dyn ConferenceDataRepository>,
    scheduler: TaskScheduler,
    result: Mediator<DataResult<i64>>,
}

impl ObserveConferenceDataUseCase {
    pub fn new(repository: Arc<dyn ConferenceDataRepository>, scheduler: TaskScheduler) -> Self {
        Self {
            repository,
            scheduler,
            result: Mediator::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<i64>> {
        self.result.observe()
    }

    pub fn execute(&self) {
        let source = self.repository.observe_data();
        self.result
            .replace_source(&self.scheduler, None, source, |result| match result {
                DataResult::Loading => None,
                other => Some(other.map(|data| data.version)),
            });
    }
}
