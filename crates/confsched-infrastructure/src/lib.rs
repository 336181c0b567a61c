//! Infrastructure for the conference schedule: catalog sources, the user-event
//! store, the merge repository, preference files, configuration and logging.

pub mod agenda_repository;
pub mod auth_state;
pub mod conference;
pub mod config_service;
pub mod dto;
pub mod logging;
pub mod paths;
pub mod preference_storage;
pub mod reminder_scheduler;
pub mod session_and_user_event_repository;
pub mod session_repository;
pub mod storage;
pub mod user_event_data_source;

#[cfg(test)]
mod testing;

pub use crate::agenda_repository::DefaultAgendaRepository;
pub use crate::auth_state::LocalAuthStateUserDataSource;
pub use crate::conference::{
    BootstrapConferenceDataSource, DefaultConferenceDataRepository, HttpConferenceDataSource,
    StaticConferenceDataSource,
};
pub use crate::config_service::ConfigService;
pub use crate::logging::init_tracing;
pub use crate::paths::ConfschedPaths;
pub use crate::preference_storage::{InMemoryPreferenceStorage, TomlPreferenceStorage};
pub use crate::reminder_scheduler::{InMemoryReminderScheduler, Reminder};
pub use crate::session_and_user_event_repository::{
    DefaultSessionAndUserEventRepository, merge_user_sessions,
};
pub use crate::session_repository::{DefaultSessionRepository, DefaultTagRepository};
pub use crate::user_event_data_source::InMemoryUserEventDataSource;
