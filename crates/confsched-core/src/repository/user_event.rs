//! Per-user event storage and the session/user-event merge.

use crate::error::Result;
use crate::model::{
    ConferenceDay, RequestResultStatus, ReservationRequestAction, Session, SessionId,
    StarUpdatedStatus, UserEvent, UserSession, UserSessionsByDay,
};
use crate::observable::Observable;
use crate::result::DataResult;
use async_trait::async_trait;

/// The remote per-user document store, keyed by `(user_id, session_id)`.
#[async_trait]
pub trait UserEventDataSource: Send + Sync {
    /// Every event of the user, re-emitted on each change.
    fn observe_user_events(&self, user_id: &str) -> Observable<DataResult<Vec<UserEvent>>>;

    /// A single event; `None` until the user interacts with the session.
    ///
    /// The registration is released once every handle is dropped, or by
    /// [`clear_single_event_subscriptions`](Self::clear_single_event_subscriptions).
    fn observe_user_event(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Observable<DataResult<Option<UserEvent>>>;

    async fn get_user_events(&self, user_id: &str) -> Result<Vec<UserEvent>>;

    async fn get_user_event(&self, user_id: &str, session_id: &str) -> Result<Option<UserEvent>>;

    /// Writes the star flag carried by `user_event`.
    async fn star_event(&self, user_id: &str, user_event: &UserEvent) -> Result<StarUpdatedStatus>;

    /// Writes a reservation request and returns how it was processed.
    async fn request_reservation(
        &self,
        user_id: &str,
        session: &Session,
        action: ReservationRequestAction,
    ) -> Result<RequestResultStatus>;

    /// Cancels the reservation on `from` and reserves `to` in one step.
    async fn swap_reservation(
        &self,
        user_id: &str,
        from: &Session,
        to: &Session,
    ) -> Result<RequestResultStatus>;

    fn clear_single_event_subscriptions(&self);
}

/// Joins the session catalog with one user's events.
///
/// A missing user id means "signed out": every session is paired with the
/// unstarred placeholder and the full catalog is still visible.
#[async_trait]
pub trait SessionAndUserEventRepository: Send + Sync {
    fn observe_user_events(&self, user_id: Option<&str>) -> Observable<DataResult<UserSessionsByDay>>;

    /// Fails with `NotFound` when `session_id` is not in the catalog.
    fn observe_user_event(
        &self,
        user_id: Option<&str>,
        session_id: &str,
    ) -> Observable<DataResult<UserSession>>;

    async fn get_user_events(&self, user_id: Option<&str>) -> Result<Vec<UserEvent>>;

    async fn get_user_session(
        &self,
        user_id: Option<&str>,
        session_id: &str,
    ) -> Result<UserSession>;

    /// Starts a star mutation. The returned observable resolves once.
    fn star_event(
        &self,
        user_id: &str,
        user_session: &UserSession,
        is_starred: bool,
    ) -> Observable<DataResult<StarUpdatedStatus>>;

    fn change_reservation(
        &self,
        user_id: &str,
        session_id: &SessionId,
        action: ReservationRequestAction,
    ) -> Observable<DataResult<RequestResultStatus>>;

    fn swap_reservation(
        &self,
        user_id: &str,
        from_session_id: &SessionId,
        to_session_id: &SessionId,
    ) -> Observable<DataResult<RequestResultStatus>>;

    fn get_conference_days(&self) -> Vec<ConferenceDay>;

    /// Tears down every single-event merge still running, for every caller.
    ///
    /// Use cases release their own merge by dropping its observable.
    fn clear_single_event_subscriptions(&self);
}
