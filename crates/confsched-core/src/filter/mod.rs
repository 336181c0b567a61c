//! Session filtering.

mod event_filter;
mod matcher;

pub use event_filter::EventFilter;
pub use matcher::{SavedFilters, UserSessionMatcher};
