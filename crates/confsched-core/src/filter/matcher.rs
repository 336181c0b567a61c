//! The active session filter.

use crate::model::{Tag, TagId, UserSession};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The persisted form of a [`UserSessionMatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedFilters {
    #[serde(default)]
    pub tag_ids: BTreeSet<TagId>,
    #[serde(default)]
    pub show_pinned_events_only: bool,
}

/// Selected tag ids plus a "my events only" flag.
///
/// Every mutator reports whether the effective state changed, so callers can
/// skip a refresh or a save on no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSessionMatcher {
    tag_ids: BTreeSet<TagId>,
    show_pinned_events_only: bool,
}

impl UserSessionMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_saved(saved: SavedFilters) -> Self {
        Self {
            tag_ids: saved.tag_ids,
            show_pinned_events_only: saved.show_pinned_events_only,
        }
    }

    pub fn to_saved(&self) -> SavedFilters {
        SavedFilters {
            tag_ids: self.tag_ids.clone(),
            show_pinned_events_only: self.show_pinned_events_only,
        }
    }

    pub fn add(&mut self, tag: &Tag) -> bool {
        self.tag_ids.insert(tag.id.clone())
    }

    pub fn remove(&mut self, tag: &Tag) -> bool {
        self.tag_ids.remove(&tag.id)
    }

    pub fn set_show_pinned_events_only(&mut self, pinned_only: bool) -> bool {
        let changed = self.show_pinned_events_only != pinned_only;
        self.show_pinned_events_only = pinned_only;
        changed
    }

    /// Resets to the unfiltered state. Returns true if any filter was active.
    pub fn clear_all(&mut self) -> bool {
        let changed = self.has_any_filters();
        self.tag_ids.clear();
        self.show_pinned_events_only = false;
        changed
    }

    pub fn is_selected(&self, tag: &Tag) -> bool {
        self.tag_ids.contains(&tag.id)
    }

    pub fn show_pinned_events_only(&self) -> bool {
        self.show_pinned_events_only
    }

    pub fn selected_tag_ids(&self) -> &BTreeSet<TagId> {
        &self.tag_ids
    }

    pub fn has_any_filters(&self) -> bool {
        !self.tag_ids.is_empty() || self.show_pinned_events_only
    }

    pub fn matches(&self, user_session: &UserSession) -> bool {
        if self.show_pinned_events_only && !user_session.user_event.is_pinned() {
            return false;
        }
        self.tag_ids.is_empty()
            || user_session
                .session
                .tag_ids()
                .any(|tag_id| self.tag_ids.contains(tag_id))
    }
}
