//! Per-user session state.
//!
//! A `UserEvent` is owned by the remote user store. It is created on the
//! first interaction with a session, toggled by star and reservation actions,
//! and never deleted.

use super::session::SessionId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReservationStatus {
    Reserved,
    Waitlisted,
    #[default]
    None,
}

/// What the user asked for on a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationRequestAction {
    Request,
    Cancel,
}

impl From<ReservationRequestAction> for ReservationAction {
    fn from(action: ReservationRequestAction) -> Self {
        match action {
            ReservationRequestAction::Request => Self::Request,
            ReservationRequestAction::Cancel => Self::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarUpdatedStatus {
    Starred,
    Unstarred,
}

impl StarUpdatedStatus {
    pub fn from_starred(is_starred: bool) -> Self {
        if is_starred {
            Self::Starred
        } else {
            Self::Unstarred
        }
    }
}

/// The last reservation request written by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub request_id: String,
    pub action: ReservationAction,
}

/// The action recorded on a `ReservationRequest`. Swaps are recorded on both
/// sessions involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationAction {
    Request,
    Cancel,
    Swap,
}

/// The processor's answer to a request with the same `request_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequestResult {
    pub request_id: String,
    pub status: RequestResultStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestResultStatus {
    ReserveSucceeded,
    ReserveWaitlisted,
    ReserveDeniedCutoff,
    ReserveDeniedClash,
    CancelSucceeded,
    CancelDeniedCutoff,
    SwapSucceeded,
    SwapWaitlisted,
    SwapDeniedCutoff,
    SwapDeniedClash,
}

impl RequestResultStatus {
    /// Statuses the user should be told about.
    pub fn message(&self) -> Option<UserEventMessageKind> {
        match self {
            Self::ReserveWaitlisted | Self::SwapWaitlisted => {
                Some(UserEventMessageKind::ReservationWaitlisted)
            }
            Self::ReserveDeniedCutoff | Self::SwapDeniedCutoff => {
                Some(UserEventMessageKind::ReservationDeniedCutoff)
            }
            Self::ReserveDeniedClash | Self::SwapDeniedClash => {
                Some(UserEventMessageKind::ReservationDeniedClash)
            }
            Self::CancelDeniedCutoff => Some(UserEventMessageKind::CancellationDeniedCutoff),
            Self::ReserveSucceeded | Self::CancelSucceeded | Self::SwapSucceeded => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserEventMessageKind {
    ReservationWaitlisted,
    ReservationDeniedCutoff,
    ReservationDeniedClash,
    CancellationDeniedCutoff,
}

/// A message about a processed reservation request, surfaced by the merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserEventMessage {
    pub kind: UserEventMessageKind,
    pub session_id: SessionId,
}

/// Mutable per-user, per-session state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserEvent {
    /// Id of the session this state belongs to.
    pub id: SessionId,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub reservation_status: ReservationStatus,
    #[serde(default)]
    pub reservation_request: Option<ReservationRequest>,
    #[serde(default)]
    pub reservation_request_result: Option<ReservationRequestResult>,
}

impl UserEvent {
    /// The placeholder used when the user never touched a session.
    pub fn unstarred(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.reservation_status == ReservationStatus::Reserved
    }

    pub fn is_waitlisted(&self) -> bool {
        self.reservation_status == ReservationStatus::Waitlisted
    }

    /// Starred or reserved: what the "my events" filter keeps.
    pub fn is_pinned(&self) -> bool {
        self.is_starred || self.is_reserved()
    }

    /// True while a written request has no matching result yet.
    pub fn is_reservation_pending(&self) -> bool {
        match (&self.reservation_request, &self.reservation_request_result) {
            (Some(request), Some(result)) => request.request_id != result.request_id,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// The message for a processed request, if it needs one.
    pub fn request_result_message(&self) -> Option<UserEventMessage> {
        let request = self.reservation_request.as_ref()?;
        let result = self.reservation_request_result.as_ref()?;
        if request.request_id != result.request_id {
            return None;
        }
        result.status.message().map(|kind| UserEventMessage {
            kind,
            session_id: self.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_request(request_id: &str, result: Option<(&str, RequestResultStatus)>) -> UserEvent {
        UserEvent {
            id: "s1".to_string(),
            reservation_request: Some(ReservationRequest {
                request_id: request_id.to_string(),
                action: ReservationAction::Request,
            }),
            reservation_request_result: result.map(|(id, status)| ReservationRequestResult {
                request_id: id.to_string(),
                status,
            }),
            ..UserEvent::default()
        }
    }

    #[test]
    fn test_placeholder_is_not_pinned() {
        let event = UserEvent::unstarred("s1");
        assert!(!event.is_starred);
        assert!(!event.is_pinned());
        assert_eq!(event.reservation_status, ReservationStatus::None);
    }

    #[test]
    fn test_reserved_counts_as_pinned() {
        let event = UserEvent {
            reservation_status: ReservationStatus::Reserved,
            ..UserEvent::unstarred("s1")
        };
        assert!(event.is_pinned());
        assert!(!event.is_waitlisted());
    }

    #[test]
    fn test_pending_until_result_matches_request() {
        assert!(with_request("r1", None).is_reservation_pending());
        assert!(
            with_request("r2", Some(("r1", RequestResultStatus::ReserveSucceeded)))
                .is_reservation_pending()
        );
        assert!(
            !with_request("r1", Some(("r1", RequestResultStatus::ReserveSucceeded)))
                .is_reservation_pending()
        );
    }

    #[test]
    fn test_message_only_for_matching_denial() {
        let denied = with_request("r1", Some(("r1", RequestResultStatus::ReserveDeniedClash)));
        assert_eq!(
            denied.request_result_message(),
            Some(UserEventMessage {
                kind: UserEventMessageKind::ReservationDeniedClash,
                session_id: "s1".to_string(),
            })
        );

        let stale = with_request("r2", Some(("r1", RequestResultStatus::ReserveDeniedClash)));
        assert_eq!(stale.request_result_message(), None);

        let ok = with_request("r1", Some(("r1", RequestResultStatus::ReserveSucceeded)));
        assert_eq!(ok.request_result_message(), None);
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ReservationStatus::Waitlisted.to_string(), "waitlisted");
        assert_eq!(StarUpdatedStatus::from_starred(true), StarUpdatedStatus::Starred);
    }
}
