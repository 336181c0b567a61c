//! Clock access and session-relative time helpers.

use crate::model::Session;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Source of the current instant.
///
/// Passed explicitly to everything that needs "now" so tests can pin it.
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedTimeProvider {
    now: Mutex<DateTime<Utc>>,
}

impl FixedTimeProvider {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *crate::sync::lock(&self.now) = now;
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        *crate::sync::lock(&self.now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionRelativeState {
    Before,
    During,
    After,
}

pub fn session_relative_state(session: &Session, now: &DateTime<Utc>) -> SessionRelativeState {
    if *now < session.start_time {
        SessionRelativeState::Before
    } else if *now < session.end_time {
        SessionRelativeState::During
    } else {
        SessionRelativeState::After
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::session;

    fn at(instant: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(instant)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_relative_state_boundaries() {
        let s = session("s1", "2019-03-11T10:00:00+05:30", 60);
        assert_eq!(
            session_relative_state(&s, &at("2019-03-11T09:59:59+05:30")),
            SessionRelativeState::Before
        );
        assert_eq!(
            session_relative_state(&s, &at("2019-03-11T10:00:00+05:30")),
            SessionRelativeState::During
        );
        assert_eq!(
            session_relative_state(&s, &at("2019-03-11T11:00:00+05:30")),
            SessionRelativeState::After
        );
    }

    #[test]
    fn test_fixed_provider_moves_only_when_set() {
        let clock = FixedTimeProvider::new(at("2019-03-11T00:00:00Z"));
        assert_eq!(clock.now(), at("2019-03-11T00:00:00Z"));
        clock.set(at("2019-03-12T00:00:00Z"));
        assert_eq!(clock.now(), at("2019-03-12T00:00:00Z"));
    }
}
