//! Catalog fetched over HTTP.

use crate::dto::ConferenceDataDocument;
use async_trait::async_trait;
use confsched_core::model::ConferenceData;
use confsched_core::repository::ConferenceDataSource;
use confsched_core::sync::lock;
use confsched_core::{Result, ScheduleError};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

/// Fetches the catalog document from a URL.
///
/// The last successful response doubles as this source's offline copy.
pub struct HttpConferenceDataSource {
    client: reqwest::Client,
    url: String,
    last_fetched: Mutex<Option<ConferenceData>>,
}

impl HttpConferenceDataSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScheduleError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
            last_fetched: Mutex::new(None),
        })
    }

    async fn fetch(&self) -> Result<ConferenceDataDocument> {
        debug!(url = %self.url, "Fetching catalog");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| ScheduleError::transport(format!("GET {} failed: {}", self.url, e)))?;

        response.json::<ConferenceDataDocument>().await.map_err(|e| {
            ScheduleError::Serialization {
                format: "JSON".to_string(),
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl ConferenceDataSource for HttpConferenceDataSource {
    async fn get_remote_conference_data(&self) -> Result<Option<ConferenceData>> {
        let data = self.fetch().await?.into_domain();
        info!(
            url = %self.url,
            version = data.version,
            sessions = data.sessions.len(),
            "Fetched remote catalog"
        );
        *lock(&self.last_fetched) = Some(data.clone());
        Ok(Some(data))
    }

    async fn get_offline_conference_data(&self) -> Result<Option<ConferenceData>> {
        Ok(lock(&self.last_fetched).clone())
    }
}
