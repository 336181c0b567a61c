use async_trait::async_trait;
use chrono::{DateTime, Utc};
use confsched_core::Result;
use confsched_core::model::{Session, SessionId};
use confsched_core::repository::ReminderScheduler;
use confsched_core::sync::lock;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// A scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub session_id: SessionId,
    pub title: String,
    pub fire_at: DateTime<Utc>,
}

/// Keeps reminders in memory; the host app polls [`due`](Self::due).
#[derive(Default)]
pub struct InMemoryReminderScheduler {
    reminders: Mutex<BTreeMap<SessionId, Reminder>>,
}

impl InMemoryReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled(&self) -> Vec<Reminder> {
        lock(&self.reminders).values().cloned().collect()
    }

    /// Reminders whose time has come, earliest first.
    pub fn due(&self, now: &DateTime<Utc>) -> Vec<Reminder> {
        let mut due: Vec<Reminder> = lock(&self.reminders)
            .values()
            .filter(|reminder| reminder.fire_at <= *now)
            .cloned()
            .collect();
        due.sort_by_key(|reminder| reminder.fire_at);
        due
    }
}

#[async_trait]
impl ReminderScheduler for InMemoryReminderScheduler {
    async fn schedule(&self, session: &Session, at: DateTime<Utc>) -> Result<()> {
        debug!(session_id = %session.id, %at, "Scheduling reminder");
        lock(&self.reminders).insert(
            session.id.clone(),
            Reminder {
                session_id: session.id.clone(),
                title: session.title.clone(),
                fire_at: at,
            },
        );
        Ok(())
    }

    async fn cancel(&self, session_id: &SessionId) -> Result<()> {
        if lock(&self.reminders).remove(session_id).is_some() {
            debug!(session_id = %session_id, "Cancelled reminder");
        }
        Ok(())
    }

    async fn cancel_all(&self) -> Result<()> {
        lock(&self.reminders).clear();
        Ok(())
    }
}
