//! Data Transfer Objects for the catalog document.
//!
//! The document format belongs to the catalog publisher. These DTOs are
//! private to the infrastructure layer and converted to domain types on load.

mod conference;

pub use conference::{ConferenceDataDocument, RoomDto, SessionDto, SpeakerDto, TagDto};
