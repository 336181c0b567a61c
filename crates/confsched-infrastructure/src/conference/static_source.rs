use async_trait::async_trait;
use confsched_core::Result;
use confsched_core::model::ConferenceData;
use confsched_core::repository::ConferenceDataSource;
use confsched_core::sync::lock;
use std::sync::Mutex;

/// An in-memory catalog source.
///
/// Used when no network source is configured, and by tests.
#[derive(Default)]
pub struct StaticConferenceDataSource {
    offline: Option<ConferenceData>,
    remote: Mutex<Option<ConferenceData>>,
}

impl StaticConferenceDataSource {
    pub fn new(offline: Option<ConferenceData>) -> Self {
        Self {
            offline,
            remote: Mutex::new(None),
        }
    }

    pub fn with_remote(self, remote: ConferenceData) -> Self {
        *lock(&self.remote) = Some(remote);
        self
    }

    /// Replaces what the next remote fetch returns.
    pub fn set_remote(&self, remote: Option<ConferenceData>) {
        *lock(&self.remote) = remote;
    }
}

#[async_trait]
impl ConferenceDataSource for StaticConferenceDataSource {
    async fn get_remote_conference_data(&self) -> Result<Option<ConferenceData>> {
        Ok(lock(&self.remote).clone())
    }

    async fn get_offline_conference_data(&self) -> Result<Option<ConferenceData>> {
        Ok(self.offline.clone())
    }
}
