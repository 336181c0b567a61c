//! Read-only accessors over the catalog.

use crate::error::Result;
use crate::model::{Block, ConferenceData, ConferenceDay, Session, Tag};
use crate::observable::Observable;
use crate::result::DataResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Single point of access to session data.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn get_sessions(&self) -> Result<Vec<Session>>;

    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: Session found
    /// - `Err(NotFound)`: No session with this ID in the current catalog
    async fn get_session(&self, session_id: &str) -> Result<Session>;

    /// Sessions starting inside `day`, in catalog order.
    async fn get_sessions_for_day(&self, day: &ConferenceDay) -> Result<Vec<Session>>;

    fn get_conference_days(&self) -> Vec<ConferenceDay>;

    /// Live catalog snapshot the sessions are read from.
    fn observe_catalog(&self) -> Observable<DataResult<Arc<ConferenceData>>>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn get_tags(&self) -> Result<Vec<Tag>>;
}

pub trait AgendaRepository: Send + Sync {
    fn get_agenda(&self) -> Vec<Block>;
}
