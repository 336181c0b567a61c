//! Repository and data-source traits.
//!
//! Implementations live in `confsched-infrastructure`; use cases depend on
//! these traits only.

mod auth;
mod conference;
mod preferences;
mod reminder;
mod session;
mod user_event;

pub use auth::AuthStateUserDataSource;
pub use conference::{ConferenceDataRepository, ConferenceDataSource};
pub use preferences::{PreferenceStorage, PreferenceUpdate, Preferences};
pub use reminder::ReminderScheduler;
pub use session::{AgendaRepository, SessionRepository, TagRepository};
pub use user_event::{SessionAndUserEventRepository, UserEventDataSource};
