//! Application layer for the conference schedule.
//!
//! Use cases coordinate the repositories from `confsched-infrastructure` and
//! publish their results as observables. [`AppContext`] wires them together.

pub mod agenda;
pub mod auth;
pub mod conference_data;
pub mod context;
pub mod filters;
pub mod preferences;
pub mod reservation;
pub mod sessions;
pub mod star_event;

#[cfg(test)]
mod testing;

pub use agenda::LoadAgendaUseCase;
pub use auth::ObserveUserAuthStateUseCase;
pub use conference_data::{ObserveConferenceDataUseCase, RefreshConferenceDataUseCase};
pub use context::AppContext;
pub use filters::{
    LoadEventFiltersUseCase, LoadSelectedFiltersUseCase, LoadTagsByCategoryUseCase,
    SaveSelectedFiltersUseCase,
};
pub use preferences::{
    GetOnboardingCompletedUseCase, GetTimeZoneUseCase, MarkScheduleUiHintsShownUseCase,
    NotificationsPrefIsShownUseCase, NotificationsPrefSaveActionUseCase,
    NotificationsPrefShownActionUseCase, OnboardingCompleteActionUseCase,
    ScheduleUiHintsShownUseCase,
};
pub use reservation::{ReservationActionUseCase, SwapActionUseCase};
pub use sessions::{
    GetConferenceDaysUseCase, LoadSessionUseCase, LoadUserSessionUseCase,
    LoadUserSessionsByDayResult, LoadUserSessionsByDayUseCase, LoadUserSessionsUseCase,
};
pub use star_event::{StarEventUseCase, StarReminderUpdater};
