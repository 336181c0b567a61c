use crate::error::Result;
use crate::model::{Session, SessionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Schedules local "session starts soon" reminders.
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    /// Schedules (or moves) the reminder for `session` to fire at `at`.
    async fn schedule(&self, session: &Session, at: DateTime<Utc>) -> Result<()>;

    async fn cancel(&self, session_id: &SessionId) -> Result<()>;

    async fn cancel_all(&self) -> Result<()>;
}
