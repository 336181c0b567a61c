//! The session/user-event merge.
//!
//! Every tick of either the catalog or the user's events recomputes the
//! whole day-bucketed view. The catalog is conference-sized, so a full
//! recomputation is cheap and never drifts from its inputs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use confsched_core::model::{
    ConferenceData, ConferenceDay, RequestResultStatus, ReservationRequestAction, SessionId,
    StarUpdatedStatus, UserEvent, UserSession, UserSessionsByDay, UserSessionsPerDay,
};
use confsched_core::observable::{MutableObservable, Observable, combine_latest};
use confsched_core::repository::{
    SessionAndUserEventRepository, SessionRepository, UserEventDataSource,
};
use confsched_core::sync::lock;
use confsched_core::time::TimeProvider;
use confsched_core::{DataResult, Result, ScheduleError, TaskScheduler};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct DefaultSessionAndUserEventRepository {
    scheduler: TaskScheduler,
    user_events: Arc<dyn UserEventDataSource>,
    sessions: Arc<dyn SessionRepository>,
    time: Arc<dyn TimeProvider>,
    single_event_merges: Mutex<Vec<CancellationToken>>,
}

impl DefaultSessionAndUserEventRepository {
    pub fn new(
        scheduler: TaskScheduler,
        user_events: Arc<dyn UserEventDataSource>,
        sessions: Arc<dyn SessionRepository>,
        time: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            scheduler,
            user_events,
            sessions,
            time,
            single_event_merges: Mutex::new(Vec::new()),
        }
    }

    #[cfg(test)]
    fn running_single_event_merges(&self) -> usize {
        lock(&self.single_event_merges)
            .iter()
            .filter(|token| !token.is_cancelled())
            .count()
    }

    /// Runs `operation` on the scheduler and exposes its outcome.
    fn mutation<T, F>(&self, operation: F) -> Observable<DataResult<T>>
    where
        T: Clone + Send + Sync + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let result = MutableObservable::with_value(DataResult::Loading);
        let observable = result.observe();
        self.scheduler.spawn(async move {
            let outcome = operation.await;
            if let Err(e) = &outcome {
                warn!(error = %e, "User event mutation failed");
            }
            result.post(outcome.into());
        });
        observable
    }
}

/// Joins the catalog with the user's events and buckets the result by day.
///
/// Sessions starting outside every day window are left out of the buckets.
pub fn merge_user_sessions(
    data: &ConferenceData,
    user_events: &[UserEvent],
    days: &[ConferenceDay],
    now: &DateTime<Utc>,
) -> UserSessionsByDay {
    let events_by_id: HashMap<&str, &UserEvent> = user_events
        .iter()
        .map(|event| (event.id.as_str(), event))
        .collect();

    let mut per_day: UserSessionsPerDay =
        days.iter().map(|day| (day.clone(), Vec::new())).collect();
    let mut pinned_session_count = 0;
    let mut user_message = None;

    for session in &data.sessions {
        let user_event = events_by_id
            .get(session.id.as_str())
            .map(|event| (*event).clone())
            .unwrap_or_else(|| UserEvent::unstarred(session.id.clone()));
        if user_event.is_pinned() {
            pinned_session_count += 1;
        }
        if user_message.is_none() {
            user_message = user_event.request_result_message();
        }

        match days.iter().find(|day| day.contains(&session.start_time)) {
            Some(day) => {
                if let Some(bucket) = per_day.get_mut(day) {
                    bucket.push(UserSession::new(session.clone(), user_event));
                }
            }
            None => debug!(session = %session.id, "Session outside every conference day"),
        }
    }

    for bucket in per_day.values_mut() {
        bucket.sort_by(|a, b| a.session.start_time.cmp(&b.session.start_time));
    }

    let first_unfinished_session = per_day
        .values()
        .flatten()
        .find(|user_session| user_session.session.end_time > *now)
        .cloned();

    UserSessionsByDay {
        user_sessions_per_day: per_day,
        pinned_session_count,
        first_unfinished_session,
        user_message,
    }
}

#[async_trait]
impl SessionAndUserEventRepository for DefaultSessionAndUserEventRepository {
    fn observe_user_events(
        &self,
        user_id: Option<&str>,
    ) -> Observable<DataResult<UserSessionsByDay>> {
        let catalog = self.sessions.observe_catalog();
        let events = match user_id {
            Some(user_id) => self.user_events.observe_user_events(user_id),
            None => Observable::just(DataResult::Success(Vec::new())),
        };
        let days = self.sessions.get_conference_days();
        let time = Arc::clone(&self.time);

        combine_latest(
            &self.scheduler,
            catalog,
            events,
            CancellationToken::new(),
            move |catalog, events| {
                catalog.as_ref().zip(events.as_ref()).map(|(data, events)| {
                    let merged = merge_user_sessions(data, events, &days, &time.now());
                    debug!(
                        version = data.version,
                        pinned = merged.pinned_session_count,
                        "Merged sessions with user events"
                    );
                    merged
                })
            },
        )
    }

    fn observe_user_event(
        &self,
        user_id: Option<&str>,
        session_id: &str,
    ) -> Observable<DataResult<UserSession>> {
        let catalog = self.sessions.observe_catalog();
        let event = match user_id {
            Some(user_id) => self.user_events.observe_user_event(user_id, session_id),
            None => Observable::just(DataResult::Success(None)),
        };
        let cancel = CancellationToken::new();
        {
            let mut merges = lock(&self.single_event_merges);
            // A merge fires its token when it ends.
            merges.retain(|token| !token.is_cancelled());
            merges.push(cancel.clone());
        }
        let session_id = session_id.to_string();

        combine_latest(
            &self.scheduler,
            catalog,
            event,
            cancel,
            move |catalog, event| {
                catalog
                    .as_ref()
                    .zip(event.as_ref())
                    .and_then(|(data, event)| match data.find_session(&session_id) {
                        Some(session) => DataResult::Success(UserSession::new(
                            session.clone(),
                            event
                                .clone()
                                .unwrap_or_else(|| UserEvent::unstarred(session_id.clone())),
                        )),
                        None => DataResult::Error(ScheduleError::session_not_found(&session_id)),
                    })
            },
        )
    }

    async fn get_user_events(&self, user_id: Option<&str>) -> Result<Vec<UserEvent>> {
        match user_id {
            Some(user_id) => self.user_events.get_user_events(user_id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn get_user_session(
        &self,
        user_id: Option<&str>,
        session_id: &str,
    ) -> Result<UserSession> {
        let session = self.sessions.get_session(session_id).await?;
        let user_event = match user_id {
            Some(user_id) => self.user_events.get_user_event(user_id, session_id).await?,
            None => None,
        };
        Ok(UserSession::new(
            session,
            user_event.unwrap_or_else(|| UserEvent::unstarred(session_id)),
        ))
    }

    fn star_event(
        &self,
        user_id: &str,
        user_session: &UserSession,
        is_starred: bool,
    ) -> Observable<DataResult<StarUpdatedStatus>> {
        let user_events = Arc::clone(&self.user_events);
        let user_id = user_id.to_string();
        let mut user_event = user_session.user_event.clone();
        user_event.id = user_session.session.id.clone();
        user_event.is_starred = is_starred;

        self.mutation(async move { user_events.star_event(&user_id, &user_event).await })
    }

    fn change_reservation(
        &self,
        user_id: &str,
        session_id: &SessionId,
        action: ReservationRequestAction,
    ) -> Observable<DataResult<RequestResultStatus>> {
        let user_events = Arc::clone(&self.user_events);
        let sessions = Arc::clone(&self.sessions);
        let user_id = user_id.to_string();
        let session_id = session_id.clone();

        self.mutation(async move {
            let session = sessions.get_session(&session_id).await?;
            user_events
                .request_reservation(&user_id, &session, action)
                .await
        })
    }

    fn swap_reservation(
        &self,
        user_id: &str,
        from_session_id: &SessionId,
        to_session_id: &SessionId,
    ) -> Observable<DataResult<RequestResultStatus>> {
        let user_events = Arc::clone(&self.user_events);
        let sessions = Arc::clone(&self.sessions);
        let user_id = user_id.to_string();
        let from_session_id = from_session_id.clone();
        let to_session_id = to_session_id.clone();

        self.mutation(async move {
            let from = sessions.get_session(&from_session_id).await?;
            let to = sessions.get_session(&to_session_id).await?;
            user_events.swap_reservation(&user_id, &from, &to).await
        })
    }

    fn get_conference_days(&self) -> Vec<ConferenceDay> {
        self.sessions.get_conference_days()
    }

    fn clear_single_event_subscriptions(&self) {
        for token in lock(&self.single_event_merges).drain(..) {
            token.cancel();
        }
        self.user_events.clear_single_event_subscriptions();
    }
}
