//! Starring sessions and keeping their reminders in step.

use chrono::{Duration, Utc};
use confsched_core::model::{Session, StarUpdatedStatus, UserSession};
use confsched_core::observable::{Mediator, Observable};
use confsched_core::repository::{ReminderScheduler, SessionAndUserEventRepository};
use confsched_core::time::{SessionRelativeState, TimeProvider, session_relative_state};
use confsched_core::{DataResult, Result, TaskScheduler};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Schedules a reminder `lead` before each starred session that has not
/// started yet, and cancels it otherwise.
pub struct StarReminderUpdater {
    reminders: Arc<dyn ReminderScheduler>,
    time: Arc<dyn TimeProvider>,
    lead: Duration,
}

impl StarReminderUpdater {
    pub fn new(
        reminders: Arc<dyn ReminderScheduler>,
        time: Arc<dyn TimeProvider>,
        lead: Duration,
    ) -> Self {
        Self {
            reminders,
            time,
            lead,
        }
    }

    pub async fn update_session(&self, session: &Session, is_starred: bool) -> Result<()> {
        let now = self.time.now();
        if is_starred && session_relative_state(session, &now) == SessionRelativeState::Before {
            let at = session.start_time.with_timezone(&Utc) - self.lead;
            self.reminders.schedule(session, at).await
        } else {
            self.reminders.cancel(&session.id).await
        }
    }

    /// Brings every given session's reminder in line with its star flag.
    pub async fn update_all(&self, user_sessions: &[UserSession]) -> Result<()> {
        let updates = user_sessions
            .iter()
            .map(|s| self.update_session(&s.session, s.user_event.is_starred));
        join_all(updates).await.into_iter().collect()
    }

    pub async fn cancel_all(&self) -> Result<()> {
        self.reminders.cancel_all().await
    }
}

/// Stars or unstars a session for a user.
///
/// Concurrent requests are all delivered; an earlier request in flight is
/// not cancelled by a later one.
pub struct StarEventUseCase {
    repository: Arc<dyn SessionAndUserEventRepository>,
    reminder_updater: Arc<StarReminderUpdater>,
    scheduler: TaskScheduler,
    result: Mediator<DataResult<StarUpdatedStatus>>,
}

impl StarEventUseCase {
    pub fn new(
        repository: Arc<dyn SessionAndUserEventRepository>,
        reminder_updater: Arc<StarReminderUpdater>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            repository,
            reminder_updater,
            scheduler,
            result: Mediator::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<StarUpdatedStatus>> {
        self.result.observe()
    }

    pub fn execute(&self, user_id: &str, user_session: &UserSession, is_starred: bool) {
        debug!(user_id, session_id = %user_session.session.id, is_starred, "Starring event");
        let source = self.repository.star_event(user_id, user_session, is_starred);
        let updater = Arc::clone(&self.reminder_updater);
        let scheduler = self.scheduler.clone();
        let session = user_session.session.clone();

        self.result.add_source(&self.scheduler, source, move |result| {
            if result.is_success() {
                let updater = Arc::clone(&updater);
                let session = session.clone();
                scheduler.spawn(async move {
                    if let Err(e) = updater.update_session(&session, is_starred).await {
                        warn!(session_id = %session.id, error = %e, "Failed to update reminder");
                    }
                });
            }
            Some(result)
        });
    }
}
