//! The merged view of a session and the user's state for it.

use super::conference::ConferenceDay;
use super::session::Session;
use super::user_event::{UserEvent, UserEventMessage};
use std::collections::BTreeMap;

/// A `(Session, UserEvent)` pair. Recomputed on every merge, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub session: Session,
    pub user_event: UserEvent,
}

impl UserSession {
    pub fn new(session: Session, user_event: UserEvent) -> Self {
        Self {
            session,
            user_event,
        }
    }

    /// A copy with the star flag replaced.
    pub fn with_starred(&self, is_starred: bool) -> Self {
        let mut copy = self.clone();
        copy.user_event.is_starred = is_starred;
        copy
    }
}

/// Sessions bucketed by conference day, each bucket sorted by start time.
pub type UserSessionsPerDay = BTreeMap<ConferenceDay, Vec<UserSession>>;

/// The result of merging the catalog with one user's events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSessionsByDay {
    pub user_sessions_per_day: UserSessionsPerDay,
    /// Number of sessions the user has starred or reserved.
    pub pinned_session_count: usize,
    /// The first session, in schedule order, that has not ended yet.
    pub first_unfinished_session: Option<UserSession>,
    /// A reservation outcome the user has not been told about.
    pub user_message: Option<UserEventMessage>,
}

impl UserSessionsByDay {
    pub fn all_user_sessions(&self) -> impl Iterator<Item = &UserSession> {
        self.user_sessions_per_day.values().flatten()
    }
}

/// Position of a session inside [`UserSessionsPerDay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventLocation {
    pub day_index: usize,
    pub session_index: usize,
}
