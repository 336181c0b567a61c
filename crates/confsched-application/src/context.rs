//! Application-lifetime wiring.
//!
//! `AppContext` builds every repository once from an [`AppConfig`] and hands
//! out use cases that share them. Nothing here is global: callers own the
//! context and drop it when the app shuts down.

use crate::agenda::LoadAgendaUseCase;
use crate::auth::ObserveUserAuthStateUseCase;
use crate::conference_data::{ObserveConferenceDataUseCase, RefreshConferenceDataUseCase};
use crate::filters::{
    LoadEventFiltersUseCase, LoadSelectedFiltersUseCase, LoadTagsByCategoryUseCase,
    SaveSelectedFiltersUseCase,
};
use crate::preferences::{
    GetOnboardingCompletedUseCase, GetTimeZoneUseCase, MarkScheduleUiHintsShownUseCase,
    NotificationsPrefIsShownUseCase, NotificationsPrefSaveActionUseCase,
    NotificationsPrefShownActionUseCase, OnboardingCompleteActionUseCase,
    ScheduleUiHintsShownUseCase,
};
use crate::reservation::{ReservationActionUseCase, SwapActionUseCase};
use crate::sessions::{
    GetConferenceDaysUseCase, LoadSessionUseCase, LoadUserSessionUseCase,
    LoadUserSessionsByDayUseCase, LoadUserSessionsUseCase,
};
use crate::star_event::{StarEventUseCase, StarReminderUpdater};
use anyhow::{Context, Result};
use chrono::{Duration, FixedOffset};
use confsched_core::TaskScheduler;
use confsched_core::config::AppConfig;
use confsched_core::repository::{
    AgendaRepository, ConferenceDataRepository, ConferenceDataSource, PreferenceStorage,
    SessionAndUserEventRepository, SessionRepository, TagRepository,
};
use confsched_core::time::{SystemTimeProvider, TimeProvider};
use confsched_infrastructure::{
    BootstrapConferenceDataSource, ConfigService, ConfschedPaths, DefaultAgendaRepository,
    DefaultConferenceDataRepository, DefaultSessionAndUserEventRepository,
    DefaultSessionRepository, DefaultTagRepository, HttpConferenceDataSource,
    InMemoryReminderScheduler, InMemoryUserEventDataSource, LocalAuthStateUserDataSource,
    StaticConferenceDataSource, TomlPreferenceStorage, init_tracing,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct AppContext {
    config: AppConfig,
    conference_offset: FixedOffset,
    scheduler: TaskScheduler,
    conference_data: Arc<dyn ConferenceDataRepository>,
    sessions: Arc<dyn SessionRepository>,
    tags: Arc<dyn TagRepository>,
    agenda: Arc<dyn AgendaRepository>,
    user_events: Arc<InMemoryUserEventDataSource>,
    user_sessions: Arc<dyn SessionAndUserEventRepository>,
    preferences: Arc<dyn PreferenceStorage>,
    reminders: Arc<InMemoryReminderScheduler>,
    reminder_updater: Arc<StarReminderUpdater>,
    auth: Arc<LocalAuthStateUserDataSource>,
}

impl AppContext {
    /// Loads the config file, installs logging and wires the app on the
    /// current tokio runtime.
    pub fn bootstrap(config_path: Option<&Path>) -> Result<Self> {
        let config = ConfigService::load(config_path).context("Failed to load configuration")?;
        init_tracing(&config.logging);
        let scheduler = TaskScheduler::current()?;
        Self::from_config(config, scheduler)
    }

    pub fn from_config(config: AppConfig, scheduler: TaskScheduler) -> Result<Self> {
        config.validate()?;
        let conference_offset = config.conference.time_zone_offset()?;
        let time: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);

        let bootstrap_path = match &config.data.bootstrap_path {
            Some(path) => path.clone(),
            None => ConfschedPaths::bootstrap_file()?,
        };
        let bootstrap: Arc<dyn ConferenceDataSource> =
            Arc::new(BootstrapConferenceDataSource::new(bootstrap_path));
        let remote: Arc<dyn ConferenceDataSource> = match &config.data.remote_url {
            Some(url) => Arc::new(
                HttpConferenceDataSource::new(
                    url.clone(),
                    std::time::Duration::from_secs(config.data.request_timeout_secs),
                )
                .context("Failed to create catalog client")?,
            ),
            None => Arc::new(StaticConferenceDataSource::default()),
        };

        let conference_data: Arc<dyn ConferenceDataRepository> =
            Arc::new(DefaultConferenceDataRepository::new(
                scheduler.clone(),
                remote,
                bootstrap,
                config.conference.conference_days(),
            ));
        let sessions: Arc<dyn SessionRepository> =
            Arc::new(DefaultSessionRepository::new(conference_data.clone()));
        let tags: Arc<dyn TagRepository> =
            Arc::new(DefaultTagRepository::new(conference_data.clone()));

        let user_events = Arc::new(InMemoryUserEventDataSource::new(
            time.clone(),
            Duration::minutes(config.reservations.cutoff_minutes),
        ));
        let user_sessions: Arc<dyn SessionAndUserEventRepository> =
            Arc::new(DefaultSessionAndUserEventRepository::new(
                scheduler.clone(),
                user_events.clone(),
                sessions.clone(),
                time.clone(),
            ));

        let preferences_path = match &config.storage.preferences_path {
            Some(path) => path.clone(),
            None => ConfschedPaths::preferences_file()?,
        };
        let preferences: Arc<dyn PreferenceStorage> =
            Arc::new(TomlPreferenceStorage::new(preferences_path));

        let reminders = Arc::new(InMemoryReminderScheduler::new());
        let reminder_updater = Arc::new(StarReminderUpdater::new(
            reminders.clone(),
            time,
            Duration::minutes(config.reminders.lead_minutes),
        ));

        info!(conference = %config.conference.name, "Application context ready");
        Ok(Self {
            config,
            conference_offset,
            scheduler,
            conference_data,
            sessions,
            tags,
            agenda: Arc::new(DefaultAgendaRepository::new()),
            user_events,
            user_sessions,
            preferences,
            reminders,
            reminder_updater,
            auth: Arc::new(LocalAuthStateUserDataSource::new()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    pub fn user_events(&self) -> &Arc<InMemoryUserEventDataSource> {
        &self.user_events
    }

    pub fn reminders(&self) -> &Arc<InMemoryReminderScheduler> {
        &self.reminders
    }

    pub fn auth(&self) -> &Arc<LocalAuthStateUserDataSource> {
        &self.auth
    }

    pub fn load_session(&self) -> LoadSessionUseCase {
        LoadSessionUseCase::new(self.sessions.clone())
    }

    pub fn load_user_session(&self) -> LoadUserSessionUseCase {
        LoadUserSessionUseCase::new(self.user_sessions.clone(), self.scheduler.clone())
    }

    pub fn load_user_sessions(&self) -> LoadUserSessionsUseCase {
        LoadUserSessionsUseCase::new(self.user_sessions.clone(), self.scheduler.clone())
    }

    pub fn load_user_sessions_by_day(&self) -> LoadUserSessionsByDayUseCase {
        LoadUserSessionsByDayUseCase::new(
            self.user_sessions.clone(),
            Arc::new(SystemTimeProvider),
            self.scheduler.clone(),
        )
    }

    pub fn get_conference_days(&self) -> GetConferenceDaysUseCase {
        GetConferenceDaysUseCase::new(self.sessions.clone())
    }

    pub fn refresh_conference_data(&self) -> RefreshConferenceDataUseCase {
        RefreshConferenceDataUseCase::new(self.conference_data.clone())
    }

    pub fn observe_conference_data(&self) -> ObserveConferenceDataUseCase {
        ObserveConferenceDataUseCase::new(self.conference_data.clone(), self.scheduler.clone())
    }

    pub fn star_event(&self) -> StarEventUseCase {
        StarEventUseCase::new(
            self.user_sessions.clone(),
            self.reminder_updater.clone(),
            self.scheduler.clone(),
        )
    }

    pub fn reservation_action(&self) -> ReservationActionUseCase {
        ReservationActionUseCase::new(self.user_sessions.clone(), self.scheduler.clone())
    }

    pub fn swap_action(&self) -> SwapActionUseCase {
        SwapActionUseCase::new(self.user_sessions.clone(), self.scheduler.clone())
    }

    pub fn load_event_filters(&self) -> LoadEventFiltersUseCase {
        LoadEventFiltersUseCase::new(self.tags.clone(), self.config.filters.columns)
    }

    pub fn load_tags_by_category(&self) -> LoadTagsByCategoryUseCase {
        LoadTagsByCategoryUseCase::new(self.tags.clone())
    }

    pub fn load_selected_filters(&self) -> LoadSelectedFiltersUseCase {
        LoadSelectedFiltersUseCase::new(self.preferences.clone())
    }

    pub fn save_selected_filters(&self) -> SaveSelectedFiltersUseCase {
        SaveSelectedFiltersUseCase::new(self.preferences.clone())
    }

    pub fn get_time_zone(&self) -> GetTimeZoneUseCase {
        GetTimeZoneUseCase::new(self.preferences.clone(), self.conference_offset)
    }

    pub fn onboarding_complete_action(&self) -> OnboardingCompleteActionUseCase {
        OnboardingCompleteActionUseCase::new(self.preferences.clone())
    }

    pub fn get_onboarding_completed(&self) -> GetOnboardingCompletedUseCase {
        GetOnboardingCompletedUseCase::new(self.preferences.clone())
    }

    pub fn notifications_pref_save_action(&self) -> NotificationsPrefSaveActionUseCase {
        NotificationsPrefSaveActionUseCase::new(self.preferences.clone())
    }

    pub fn notifications_pref_shown_action(&self) -> NotificationsPrefShownActionUseCase {
        NotificationsPrefShownActionUseCase::new(self.preferences.clone())
    }

    pub fn notifications_pref_is_shown(&self) -> NotificationsPrefIsShownUseCase {
        NotificationsPrefIsShownUseCase::new(self.preferences.clone())
    }

    pub fn schedule_ui_hints_shown(&self) -> ScheduleUiHintsShownUseCase {
        ScheduleUiHintsShownUseCase::new(self.preferences.clone())
    }

    pub fn mark_schedule_ui_hints_shown(&self) -> MarkScheduleUiHintsShownUseCase {
        MarkScheduleUiHintsShownUseCase::new(self.preferences.clone())
    }

    pub fn observe_user_auth_state(&self) -> ObserveUserAuthStateUseCase {
        ObserveUserAuthStateUseCase::new(
            self.auth.clone(),
            self.user_sessions.clone(),
            self.reminder_updater.clone(),
            self.scheduler.clone(),
        )
    }

    pub fn load_agenda(&self) -> LoadAgendaUseCase {
        LoadAgendaUseCase::new(self.agenda.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsched_core::DataResult;
    use confsched_core::filter::UserSessionMatcher;
    use confsched_core::model::AuthenticatedUserInfo;
    use tempfile::TempDir;
    use tokio::time::timeout;

    const CATALOG: &str = r#"{
        "version": 3,
        "sessions": [
            {
                "id": "s1",
                "title": "Opening",
                "startTime": "2019-03-11T10:00:00+05:30",
                "endTime": "2019-03-11T11:00:00+05:30",
                "tags": ["topic_android"]
            },
            {
                "id": "s2",
                "title": "Closing",
                "startTime": "2019-03-13T18:00:00+05:30",
                "endTime": "2019-03-13T19:00:00+05:30"
            }
        ],
        "tags": [
            {
                "id": "topic_android",
                "category": "topic",
                "tagName": "topic_android",
                "orderInCategory": 0,
                "displayName": "Android"
            }
        ]
    }"#;

    fn config(temp_dir: &TempDir) -> AppConfig {
        let bootstrap = temp_dir.path().join("conference_data.json");
        std::fs::write(&bootstrap, CATALOG).unwrap();
        let mut config = AppConfig::default();
        config.data.bootstrap_path = Some(bootstrap);
        config.storage.preferences_path = Some(temp_dir.path().join("preferences.toml"));
        config
    }

    #[tokio::test]
    async fn test_context_serves_bootstrap_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let context =
            AppContext::from_config(config(&temp_dir), TaskScheduler::current().unwrap()).unwrap();

        let use_case = context.load_user_sessions_by_day();
        let mut observable = use_case.observe();
        use_case.execute(UserSessionMatcher::new(), None);
        let result = timeout(
            std::time::Duration::from_secs(2),
            observable.wait_for(DataResult::is_success),
        )
        .await
        .unwrap()
        .unwrap()
        .into_success()
        .unwrap();
        assert_eq!(result.user_session_count, 2);
        assert_eq!(result.user_sessions_per_day.len(), 2);

        let filters = context
            .load_event_filters()
            .execute(&UserSessionMatcher::new())
            .await
            .unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(context.get_conference_days().execute().len(), 2);
        assert_eq!(context.load_agenda().execute().len(), 5);
    }

    #[tokio::test]
    async fn test_context_persists_preferences() {
        let temp_dir = TempDir::new().unwrap();
        let scheduler = TaskScheduler::current().unwrap();
        {
            let context = AppContext::from_config(config(&temp_dir), scheduler.clone()).unwrap();
            context.onboarding_complete_action().execute(true).await.unwrap();
        }

        let context = AppContext::from_config(config(&temp_dir), scheduler).unwrap();
        assert!(context.get_onboarding_completed().execute().await.unwrap());
        assert_eq!(
            context.get_time_zone().execute().await.unwrap(),
            FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
        );
    }

    #[tokio::test]
    async fn test_context_star_flow() {
        let temp_dir = TempDir::new().unwrap();
        let context =
            AppContext::from_config(config(&temp_dir), TaskScheduler::current().unwrap()).unwrap();

        let auth_state = context.observe_user_auth_state();
        let mut user = auth_state.observe();
        auth_state.execute();
        context.auth().sign_in(AuthenticatedUserInfo::new("u1"));
        timeout(std::time::Duration::from_secs(2), user.wait_for(DataResult::is_success))
            .await
            .unwrap()
            .unwrap();

        let load = context.load_user_session();
        let mut session = load.observe();
        load.execute(Some("u1"), "s1");
        let user_session = timeout(
            std::time::Duration::from_secs(2),
            session.wait_for(DataResult::is_success),
        )
        .await
        .unwrap()
        .unwrap()
        .into_success()
        .unwrap();

        let star = context.star_event();
        let mut starred = star.observe();
        star.execute("u1", &user_session, true);
        timeout(
            std::time::Duration::from_secs(2),
            starred.wait_for(DataResult::is_success),
        )
        .await
        .unwrap()
        .unwrap();

        let reloaded = timeout(
            std::time::Duration::from_secs(2),
            session.wait_for(|r| r.success().is_some_and(|s| s.user_event.is_starred)),
        )
        .await
        .unwrap();
        assert!(reloaded.is_some());
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.conference.time_zone = "Asia/Kolkata".to_string();
        assert!(AppContext::from_config(config, TaskScheduler::current().unwrap()).is_err());
    }
}
