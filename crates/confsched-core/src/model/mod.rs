//! Domain model.
//!
//! # Module Structure
//!
//! - `tag`: session tags and their categories
//! - `session`: catalog sessions, rooms and speakers
//! - `conference`: the catalog snapshot and conference days
//! - `user_event`: per-user star and reservation state
//! - `user_session`: merged session and user state, bucketed by day
//! - `agenda`: fixed agenda blocks
//! - `auth`: signed-in user info

mod agenda;
mod auth;
mod conference;
mod session;
mod tag;
mod user_event;
mod user_session;

pub use agenda::Block;
pub use auth::AuthenticatedUserInfo;
pub use conference::{ConferenceData, ConferenceDay};
pub use session::{Room, Session, SessionId, SessionType, Speaker, SpeakerId};
pub use tag::{Tag, TagCategory, TagId};
pub use user_event::{
    RequestResultStatus, ReservationAction, ReservationRequest, ReservationRequestAction,
    ReservationRequestResult, ReservationStatus, StarUpdatedStatus, UserEvent, UserEventMessage,
    UserEventMessageKind,
};
pub use user_session::{EventLocation, UserSession, UserSessionsByDay, UserSessionsPerDay};

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Session, Tag, TagCategory};
    use chrono::{DateTime, Duration};
    use std::collections::BTreeSet;

    pub(crate) fn session(id: &str, start: &str, minutes: i64) -> Session {
        let start_time = DateTime::parse_from_rfc3339(start).unwrap();
        Session {
            id: id.to_string(),
            title: format!("Session {id}"),
            description: String::new(),
            start_time,
            end_time: start_time + Duration::minutes(minutes),
            room: None,
            tags: Vec::new(),
            speakers: Vec::new(),
            related_sessions: BTreeSet::new(),
            photo_url: None,
            youtube_url: None,
            session_url: None,
            is_livestream: false,
        }
    }

    pub(crate) fn tag(id: &str, category: TagCategory, tag_name: &str, order: i32) -> Tag {
        Tag {
            id: id.to_string(),
            category,
            tag_name: tag_name.to_string(),
            order_in_category: order,
            display_name: id.to_string(),
            color: None,
        }
    }
}
