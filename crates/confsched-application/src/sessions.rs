//! Session use cases.
//!
//! Each use case owns a result observable. `execute` points it at a fresh
//! repository stream; the previous stream is dropped first, so a result for
//! an old key never overwrites the result for the current one.

use chrono::{DateTime, Utc};
use confsched_core::filter::UserSessionMatcher;
use confsched_core::model::{
    ConferenceDay, EventLocation, Session, SessionId, UserEventMessage, UserSession,
    UserSessionsByDay, UserSessionsPerDay,
};
use confsched_core::observable::{Mediator, MutableObservable, Observable};
use confsched_core::repository::{SessionAndUserEventRepository, SessionRepository};
use confsched_core::time::TimeProvider;
use confsched_core::{DataResult, TaskScheduler};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Loads one catalog session by id.
pub struct LoadSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    result: MutableObservable<DataResult<Session>>,
}

impl LoadSessionUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            repository,
            result: MutableObservable::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<Session>> {
        self.result.observe()
    }

    pub async fn execute(&self, session_id: &str) {
        self.result.post(DataResult::Loading);
        let outcome = self.repository.get_session(session_id).await;
        self.result.post(outcome.into());
    }
}

/// Observes one session merged with the user's state for it.
pub struct LoadUserSessionUseCase {
    repository: Arc<dyn SessionAndUserEventRepository>,
    scheduler: TaskScheduler,
    result: Mediator<DataResult<UserSession>>,
}

impl LoadUserSessionUseCase {
    pub fn new(
        repository: Arc<dyn SessionAndUserEventRepository>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            repository,
            scheduler,
            result: Mediator::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<UserSession>> {
        self.result.observe()
    }

    pub fn execute(&self, user_id: Option<&str>, session_id: &str) {
        debug!(?user_id, session_id, "Loading user session");
        let source = self.repository.observe_user_event(user_id, session_id);
        self.result.replace_source(&self.scheduler, None, source, Some);
    }

    /// Stops delivery. The merge behind the dropped source ends once
    /// nothing observes it, leaving other callers' streams running.
    pub fn on_cleared(&self) {
        self.result.clear_sources();
    }
}

/// Observes a fixed set of sessions, in start-time order.
pub struct LoadUserSessionsUseCase {
    repository: Arc<dyn SessionAndUserEventRepository>,
    scheduler: TaskScheduler,
    result: Mediator<DataResult<Vec<UserSession>>>,
}

impl LoadUserSessionsUseCase {
    pub fn new(
        repository: Arc<dyn SessionAndUserEventRepository>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            repository,
            scheduler,
            result: Mediator::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<Vec<UserSession>>> {
        self.result.observe()
    }

    /// Nothing is posted while none of `session_ids` is in the catalog.
    pub fn execute(&self, user_id: Option<&str>, session_ids: BTreeSet<SessionId>) {
        let source = self.repository.observe_user_events(user_id);
        self.result
            .replace_source(&self.scheduler, None, source, move |result| match result {
                DataResult::Success(by_day) => {
                    let mut relevant: Vec<UserSession> = by_day
                        .all_user_sessions()
                        .filter(|s| session_ids.contains(&s.session.id))
                        .cloned()
                        .collect();
                    relevant.sort_by_key(|s| s.session.start_time);
                    (!relevant.is_empty()).then_some(DataResult::Success(relevant))
                }
                DataResult::Error(e) => Some(DataResult::Error(e)),
                DataResult::Loading => Some(DataResult::Loading),
            });
    }

    pub fn on_cleared(&self) {
        self.result.clear_sources();
    }
}

/// The schedule as shown: filtered buckets plus the "now" marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadUserSessionsByDayResult {
    pub user_sessions_per_day: UserSessionsPerDay,
    pub user_message: Option<UserEventMessage>,
    /// Sessions left after filtering, over all days.
    pub user_session_count: usize,
    pub first_unfinished_session: Option<EventLocation>,
}

/// Observes the whole schedule filtered by a matcher.
pub struct LoadUserSessionsByDayUseCase {
    repository: Arc<dyn SessionAndUserEventRepository>,
    time: Arc<dyn TimeProvider>,
    scheduler: TaskScheduler,
    result: Mediator<DataResult<LoadUserSessionsByDayResult>>,
}

impl LoadUserSessionsByDayUseCase {
    pub fn new(
        repository: Arc<dyn SessionAndUserEventRepository>,
        time: Arc<dyn TimeProvider>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            repository,
            time,
            scheduler,
            result: Mediator::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<LoadUserSessionsByDayResult>> {
        self.result.observe()
    }

    pub fn execute(&self, matcher: UserSessionMatcher, user_id: Option<&str>) {
        let source = self.repository.observe_user_events(user_id);
        let days = self.repository.get_conference_days();
        let time = Arc::clone(&self.time);
        self.result
            .replace_source(&self.scheduler, None, source, move |result| {
                Some(result.map(|by_day| filter_by_day(&by_day, &matcher, &days, &time.now())))
            });
    }

    pub fn on_cleared(&self) {
        self.result.clear_sources();
    }
}

fn filter_by_day(
    by_day: &UserSessionsByDay,
    matcher: &UserSessionMatcher,
    days: &[ConferenceDay],
    now: &DateTime<Utc>,
) -> LoadUserSessionsByDayResult {
    let user_sessions_per_day: UserSessionsPerDay = by_day
        .user_sessions_per_day
        .iter()
        .map(|(day, sessions)| {
            let kept = sessions
                .iter()
                .filter(|s| matcher.matches(s))
                .cloned()
                .collect();
            (day.clone(), kept)
        })
        .collect();
    let user_session_count = user_sessions_per_day.values().map(Vec::len).sum();
    let first_unfinished_session = find_first_unfinished_session(&user_sessions_per_day, days, now);

    LoadUserSessionsByDayResult {
        user_sessions_per_day,
        user_message: by_day.user_message.clone(),
        user_session_count,
        first_unfinished_session,
    }
}

/// Locates the first session still running or upcoming, while the
/// conference is on.
fn find_first_unfinished_session(
    per_day: &UserSessionsPerDay,
    days: &[ConferenceDay],
    now: &DateTime<Utc>,
) -> Option<EventLocation> {
    let (first, last) = (days.first()?, days.last()?);
    if *now < first.start || *now >= last.end {
        return None;
    }
    days.iter().enumerate().find_map(|(day_index, day)| {
        let sessions = per_day.get(day)?;
        sessions
            .iter()
            .position(|s| s.session.end_time > *now)
            .map(|session_index| EventLocation {
                day_index,
                session_index,
            })
    })
}

pub struct GetConferenceDaysUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetConferenceDaysUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub fn execute(&self) -> Vec<ConferenceDay> {
        self.repository.get_conference_days()
    }
}
