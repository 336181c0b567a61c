//! Catalog shipped with the app as a JSON file.

use crate::dto::ConferenceDataDocument;
use async_trait::async_trait;
use confsched_core::model::ConferenceData;
use confsched_core::repository::ConferenceDataSource;
use confsched_core::{Result, ScheduleError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the catalog from a bootstrap JSON file.
///
/// The file is the offline copy of last resort and never has a remote one.
pub struct BootstrapConferenceDataSource {
    path: PathBuf,
}

impl BootstrapConferenceDataSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parses a catalog document.
    pub fn parse(content: &str) -> Result<ConferenceData> {
        let document: ConferenceDataDocument = serde_json::from_str(content)?;
        Ok(document.into_domain())
    }
}

#[async_trait]
impl ConferenceDataSource for BootstrapConferenceDataSource {
    async fn get_remote_conference_data(&self) -> Result<Option<ConferenceData>> {
        Ok(None)
    }

    async fn get_offline_conference_data(&self) -> Result<Option<ConferenceData>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No bootstrap catalog");
                return Ok(None);
            }
            Err(e) => {
                return Err(ScheduleError::io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let data = Self::parse(&content)?;
        debug!(
            path = %self.path.display(),
            sessions = data.sessions.len(),
            "Loaded bootstrap catalog"
        );
        Ok(Some(data))
    }
}
