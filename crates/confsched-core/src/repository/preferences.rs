//! Local key-value preferences.

use crate::error::Result;
use crate::filter::SavedFilters;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub selected_filters: SavedFilters,
    #[serde(default)]
    pub onboarding_completed: bool,
    /// Show times in the venue's offset instead of the device's.
    #[serde(default = "default_true")]
    pub prefer_conference_time_zone: bool,
    #[serde(default)]
    pub notifications_preference_shown: bool,
    #[serde(default)]
    pub receive_notifications: bool,
    #[serde(default)]
    pub schedule_ui_hints_shown: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_filters: SavedFilters::default(),
            onboarding_completed: false,
            prefer_conference_time_zone: true,
            notifications_preference_shown: false,
            receive_notifications: false,
            schedule_ui_hints_shown: false,
        }
    }
}

/// A single preference write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceUpdate {
    SelectedFilters(SavedFilters),
    OnboardingCompleted(bool),
    PreferConferenceTimeZone(bool),
    NotificationsPreferenceShown(bool),
    ReceiveNotifications(bool),
    ScheduleUiHintsShown(bool),
}

impl Preferences {
    /// Applies `update`, returning whether anything changed.
    pub fn apply(&mut self, update: PreferenceUpdate) -> bool {
        fn set<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                return false;
            }
            *slot = value;
            true
        }

        match update {
            PreferenceUpdate::SelectedFilters(filters) => set(&mut self.selected_filters, filters),
            PreferenceUpdate::OnboardingCompleted(value) => {
                set(&mut self.onboarding_completed, value)
            }
            PreferenceUpdate::PreferConferenceTimeZone(value) => {
                set(&mut self.prefer_conference_time_zone, value)
            }
            PreferenceUpdate::NotificationsPreferenceShown(value) => {
                set(&mut self.notifications_preference_shown, value)
            }
            PreferenceUpdate::ReceiveNotifications(value) => {
                set(&mut self.receive_notifications, value)
            }
            PreferenceUpdate::ScheduleUiHintsShown(value) => {
                set(&mut self.schedule_ui_hints_shown, value)
            }
        }
    }
}

/// Storage for [`Preferences`].
#[async_trait]
pub trait PreferenceStorage: Send + Sync {
    /// Loads preferences; a store that was never written yields defaults.
    async fn load(&self) -> Result<Preferences>;

    /// Applies one update and persists it. Returns the new preferences.
    async fn update(&self, update: PreferenceUpdate) -> Result<Preferences>;
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reports_changes() {
        let mut prefs = Preferences::default();
        assert!(prefs.apply(PreferenceUpdate::OnboardingCompleted(true)));
        assert!(!prefs.apply(PreferenceUpdate::OnboardingCompleted(true)));
        assert!(!prefs.apply(PreferenceUpdate::PreferConferenceTimeZone(true)));
        assert!(prefs.apply(PreferenceUpdate::PreferConferenceTimeZone(false)));
        assert!(!prefs.prefer_conference_time_zone);
    }

    #[test]
    fn test_missing_fields_deserialize_to_defaults() {
        let prefs: Preferences = toml::from_str("onboarding_completed = true").unwrap();
        assert!(prefs.onboarding_completed);
        assert!(prefs.prefer_conference_time_zone);
        assert_eq!(prefs.selected_filters, SavedFilters::default());
    }
}
