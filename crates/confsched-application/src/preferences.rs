//! Small use cases over the stored preference flags.

use chrono::{FixedOffset, Local, Offset};
use confsched_core::Result;
use confsched_core::repository::{PreferenceStorage, PreferenceUpdate};
use std::sync::Arc;

/// The offset session times are shown in: the venue's, or the device's
/// when the user opted out of conference time.
pub struct GetTimeZoneUseCase {
    preferences: Arc<dyn PreferenceStorage>,
    conference_offset: FixedOffset,
}

impl GetTimeZoneUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>, conference_offset: FixedOffset) -> Self {
        Self {
            preferences,
            conference_offset,
        }
    }

    pub async fn execute(&self) -> Result<FixedOffset> {
        let preferences = self.preferences.load().await?;
        if preferences.prefer_conference_time_zone {
            Ok(self.conference_offset)
        } else {
            Ok(Local::now().offset().fix())
        }
    }
}

pub struct OnboardingCompleteActionUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl OnboardingCompleteActionUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self, completed: bool) -> Result<()> {
        self.preferences
            .update(PreferenceUpdate::OnboardingCompleted(completed))
            .await?;
        Ok(())
    }
}

pub struct GetOnboardingCompletedUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl GetOnboardingCompletedUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self) -> Result<bool> {
        Ok(self.preferences.load().await?.onboarding_completed)
    }
}

/// Stores whether the user wants reminders at all.
pub struct NotificationsPrefSaveActionUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl NotificationsPrefSaveActionUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self, receive_notifications: bool) -> Result<()> {
        self.preferences
            .update(PreferenceUpdate::ReceiveNotifications(receive_notifications))
            .await?;
        Ok(())
    }
}

/// Records that the notifications question has been asked.
pub struct NotificationsPrefShownActionUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl NotificationsPrefShownActionUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self, shown: bool) -> Result<()> {
        self.preferences
            .update(PreferenceUpdate::NotificationsPreferenceShown(shown))
            .await?;
        Ok(())
    }
}

pub struct NotificationsPrefIsShownUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl NotificationsPrefIsShownUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self) -> Result<bool> {
        Ok(self
            .preferences
            .load()
            .await?
            .notifications_preference_shown)
    }
}

pub struct ScheduleUiHintsShownUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl ScheduleUiHintsShownUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self) -> Result<bool> {
        Ok(self.preferences.load().await?.schedule_ui_hints_shown)
    }
}

pub struct MarkScheduleUiHintsShownUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl MarkScheduleUiHintsShownUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self) -> Result<()> {
        self.preferences
            .update(PreferenceUpdate::ScheduleUiHintsShown(true))
            .await?;
        Ok(())
    }
}
