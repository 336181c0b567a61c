//! In-memory UserEventDataSource implementation.
//!
//! Simulates the remote per-user store together with the reservation
//! processor that answers requests on it:
//! - requests and cancellations inside the cutoff window are denied
//! - a request overlapping another reserved session is denied as a clash
//! - a room with a capacity waitlists requests once it is full, and a
//!   cancellation promotes the head of the waitlist
//! - a denied swap changes nothing; an accepted swap cancels the old
//!   reservation and reserves (or waitlists) the new one

use async_trait::async_trait;
use chrono::Duration;
use confsched_core::model::{
    RequestResultStatus, ReservationAction, ReservationRequest, ReservationRequestAction,
    ReservationRequestResult, ReservationStatus, Session, SessionId, StarUpdatedStatus, UserEvent,
};
use confsched_core::observable::{MutableObservable, Observable};
use confsched_core::repository::UserEventDataSource;
use confsched_core::sync::lock;
use confsched_core::time::TimeProvider;
use confsched_core::{DataResult, Result, ScheduleError};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

type UserId = String;

pub struct InMemoryUserEventDataSource {
    time: Arc<dyn TimeProvider>,
    cutoff: Duration,
    offline: AtomicBool,
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    documents: HashMap<UserId, BTreeMap<SessionId, UserEvent>>,
    seats: HashMap<SessionId, SeatState>,
    user_channels: HashMap<UserId, MutableObservable<DataResult<Vec<UserEvent>>>>,
    event_channels: HashMap<(UserId, SessionId), MutableObservable<DataResult<Option<UserEvent>>>>,
}

/// Reservation bookkeeping for one session.
#[derive(Default)]
struct SeatState {
    session: Option<Session>,
    reserved: BTreeSet<UserId>,
    waitlist: VecDeque<UserId>,
}

impl SeatState {
    fn has_free_seat(&self, session: &Session) -> bool {
        match session.room.as_ref().and_then(|room| room.capacity) {
            Some(capacity) => self.reserved.len() < capacity as usize,
            None => true,
        }
    }
}

impl InMemoryUserEventDataSource {
    pub fn new(time: Arc<dyn TimeProvider>, cutoff: Duration) -> Self {
        Self {
            time,
            cutoff,
            offline: AtomicBool::new(false),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Simulates losing the connection to the store.
    ///
    /// While offline every read and write fails with a transport error, and
    /// open observers receive that error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
        let state = lock(&self.state);
        for (user_id, channel) in &state.user_channels {
            if offline {
                channel.post(DataResult::Error(Self::unreachable()));
            } else {
                channel.post(DataResult::Success(state.events_of(user_id)));
            }
        }
        for ((user_id, session_id), channel) in &state.event_channels {
            if offline {
                channel.post(DataResult::Error(Self::unreachable()));
            } else {
                channel.post(DataResult::Success(state.event_of(user_id, session_id)));
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn event_channel_count(&self) -> usize {
        lock(&self.state).event_channels.len()
    }

    fn unreachable() -> ScheduleError {
        ScheduleError::transport("User event store unreachable")
    }

    fn ensure_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Self::unreachable());
        }
        Ok(())
    }

    fn within_cutoff(&self, session: &Session) -> bool {
        self.time.now() >= session.start_time - self.cutoff
    }
}

impl StoreState {
    fn events_of(&self, user_id: &str) -> Vec<UserEvent> {
        self.documents
            .get(user_id)
            .map(|events| events.values().cloned().collect())
            .unwrap_or_default()
    }

    fn event_of(&self, user_id: &str, session_id: &str) -> Option<UserEvent> {
        self.documents
            .get(user_id)
            .and_then(|events| events.get(session_id))
            .cloned()
    }

    fn event_mut(&mut self, user_id: &str, session_id: &str) -> &mut UserEvent {
        self.documents
            .entry(user_id.to_string())
            .or_default()
            .entry(session_id.to_string())
            .or_insert_with(|| UserEvent::unstarred(session_id))
    }

    fn reserved_sessions_of<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Session> {
        self.seats.values().filter_map(move |seats| {
            seats
                .session
                .as_ref()
                .filter(|_| seats.reserved.contains(user_id))
        })
    }

    fn clashes(&self, user_id: &str, session: &Session, ignoring: Option<&str>) -> bool {
        self.reserved_sessions_of(user_id)
            .filter(|other| other.id != session.id && Some(other.id.as_str()) != ignoring)
            .any(|other| other.overlaps(session))
    }

    fn set_status(&mut self, user_id: &str, session_id: &str, status: ReservationStatus) {
        self.event_mut(user_id, session_id).reservation_status = status;
    }

    fn record(
        &mut self,
        user_id: &str,
        session_id: &str,
        request_id: &str,
        action: ReservationAction,
        status: RequestResultStatus,
    ) {
        let event = self.event_mut(user_id, session_id);
        event.reservation_request = Some(ReservationRequest {
            request_id: request_id.to_string(),
            action,
        });
        event.reservation_request_result = Some(ReservationRequestResult {
            request_id: request_id.to_string(),
            status,
        });
    }

    /// Takes a seat or joins the waitlist. Returns the resulting status.
    fn reserve(&mut self, user_id: &str, session: &Session) -> ReservationStatus {
        let seats = self.seats.entry(session.id.clone()).or_default();
        seats.session = Some(session.clone());
        let status = if seats.reserved.contains(user_id) {
            ReservationStatus::Reserved
        } else if seats.waitlist.iter().any(|id| id == user_id) {
            ReservationStatus::Waitlisted
        } else if seats.has_free_seat(session) {
            seats.reserved.insert(user_id.to_string());
            ReservationStatus::Reserved
        } else {
            seats.waitlist.push_back(user_id.to_string());
            ReservationStatus::Waitlisted
        };
        self.set_status(user_id, &session.id, status);
        status
    }

    /// Releases the user's seat or waitlist slot. Returns the user promoted
    /// from the waitlist, if any.
    fn release(&mut self, user_id: &str, session_id: &str) -> Option<UserId> {
        self.set_status(user_id, session_id, ReservationStatus::None);
        let seats = self.seats.get_mut(session_id)?;
        seats.waitlist.retain(|id| id != user_id);
        if !seats.reserved.remove(user_id) {
            return None;
        }
        let promoted = seats.waitlist.pop_front()?;
        seats.reserved.insert(promoted.clone());
        self.set_status(&promoted, session_id, ReservationStatus::Reserved);
        Some(promoted)
    }

    /// Pushes the current state of `user_id` to its open observers.
    fn notify(&self, user_id: &str, session_ids: &[&str]) {
        if let Some(channel) = self.user_channels.get(user_id) {
            channel.post(DataResult::Success(self.events_of(user_id)));
        }
        for session_id in session_ids {
            let key = (user_id.to_string(), session_id.to_string());
            if let Some(channel) = self.event_channels.get(&key) {
                channel.post(DataResult::Success(self.event_of(user_id, session_id)));
            }
        }
    }
}

#[async_trait]
impl UserEventDataSource for InMemoryUserEventDataSource {
    fn observe_user_events(&self, user_id: &str) -> Observable<DataResult<Vec<UserEvent>>> {
        let mut state = lock(&self.state);
        let current = if self.offline.load(Ordering::SeqCst) {
            DataResult::Error(Self::unreachable())
        } else {
            DataResult::Success(state.events_of(user_id))
        };
        state.user_channels.retain(|_, channel| channel.observer_count() > 0);
        state
            .user_channels
            .entry(user_id.to_string())
            .or_insert_with(|| MutableObservable::with_value(current))
            .observe()
    }

    fn observe_user_event(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Observable<DataResult<Option<UserEvent>>> {
        let mut state = lock(&self.state);
        let current = if self.offline.load(Ordering::SeqCst) {
            DataResult::Error(Self::unreachable())
        } else {
            DataResult::Success(state.event_of(user_id, session_id))
        };
        state
            .event_channels
            .retain(|_, channel| channel.observer_count() > 0);
        state
            .event_channels
            .entry((user_id.to_string(), session_id.to_string()))
            .or_insert_with(|| MutableObservable::with_value(current))
            .observe()
    }

    async fn get_user_events(&self, user_id: &str) -> Result<Vec<UserEvent>> {
        self.ensure_online()?;
        Ok(lock(&self.state).events_of(user_id))
    }

    async fn get_user_event(&self, user_id: &str, session_id: &str) -> Result<Option<UserEvent>> {
        self.ensure_online()?;
        Ok(lock(&self.state).event_of(user_id, session_id))
    }

    async fn star_event(&self, user_id: &str, user_event: &UserEvent) -> Result<StarUpdatedStatus> {
        if let Err(e) = self.ensure_online() {
            warn!(user_id, session_id = %user_event.id, "Star write failed: {}", e);
            return Err(e);
        }
        let mut state = lock(&self.state);
        state.event_mut(user_id, &user_event.id).is_starred = user_event.is_starred;
        state.notify(user_id, &[user_event.id.as_str()]);
        debug!(user_id, session_id = %user_event.id, starred = user_event.is_starred, "Star updated");
        Ok(StarUpdatedStatus::from_starred(user_event.is_starred))
    }

    async fn request_reservation(
        &self,
        user_id: &str,
        session: &Session,
        action: ReservationRequestAction,
    ) -> Result<RequestResultStatus> {
        self.ensure_online()?;
        let request_id = Uuid::new_v4().to_string();
        let within_cutoff = self.within_cutoff(session);
        let mut state = lock(&self.state);

        let mut promoted = None;
        let status = match action {
            ReservationRequestAction::Request if within_cutoff => {
                RequestResultStatus::ReserveDeniedCutoff
            }
            ReservationRequestAction::Request if state.clashes(user_id, session, None) => {
                RequestResultStatus::ReserveDeniedClash
            }
            ReservationRequestAction::Request => match state.reserve(user_id, session) {
                ReservationStatus::Waitlisted => RequestResultStatus::ReserveWaitlisted,
                _ => RequestResultStatus::ReserveSucceeded,
            },
            ReservationRequestAction::Cancel if within_cutoff => {
                RequestResultStatus::CancelDeniedCutoff
            }
            ReservationRequestAction::Cancel => {
                promoted = state.release(user_id, &session.id);
                RequestResultStatus::CancelSucceeded
            }
        };

        state.record(user_id, &session.id, &request_id, action.into(), status);
        state.notify(user_id, &[session.id.as_str()]);
        if let Some(promoted) = promoted {
            debug!(user_id = %promoted, session_id = %session.id, "Promoted from waitlist");
            state.notify(&promoted, &[session.id.as_str()]);
        }
        debug!(user_id, session_id = %session.id, ?status, "Reservation request processed");
        Ok(status)
    }

    async fn swap_reservation(
        &self,
        user_id: &str,
        from: &Session,
        to: &Session,
    ) -> Result<RequestResultStatus> {
        self.ensure_online()?;
        let request_id = Uuid::new_v4().to_string();
        let within_cutoff = self.within_cutoff(from) || self.within_cutoff(to);
        let mut state = lock(&self.state);

        let mut promoted = None;
        let status = if within_cutoff {
            RequestResultStatus::SwapDeniedCutoff
        } else if state.clashes(user_id, to, Some(from.id.as_str())) {
            RequestResultStatus::SwapDeniedClash
        } else {
            promoted = state.release(user_id, &from.id);
            match state.reserve(user_id, to) {
                ReservationStatus::Waitlisted => RequestResultStatus::SwapWaitlisted,
                _ => RequestResultStatus::SwapSucceeded,
            }
        };

        for session_id in [&from.id, &to.id] {
            state.record(user_id, session_id, &request_id, ReservationAction::Swap, status);
        }
        state.notify(user_id, &[from.id.as_str(), to.id.as_str()]);
        if let Some(promoted) = promoted {
            state.notify(&promoted, &[from.id.as_str()]);
        }
        debug!(user_id, from = %from.id, to = %to.id, ?status, "Swap request processed");
        Ok(status)
    }

    fn clear_single_event_subscriptions(&self) {
        lock(&self.state).event_channels.clear();
    }
}
