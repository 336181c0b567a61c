//! Signed-in user tracking.

use crate::star_event::StarReminderUpdater;
use confsched_core::model::AuthenticatedUserInfo;
use confsched_core::observable::{MutableObservable, Observable, Subscription};
use confsched_core::repository::{AuthStateUserDataSource, SessionAndUserEventRepository};
use confsched_core::sync::lock;
use confsched_core::{DataResult, Result, TaskScheduler};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Publishes the signed-in user and keeps reminders tied to that user.
///
/// The result is empty while nobody is signed in. When a different user
/// signs in, reminders are rebuilt from that user's starred sessions; on
/// sign-out they are all cancelled.
pub struct ObserveUserAuthStateUseCase {
    auth: Arc<dyn AuthStateUserDataSource>,
    user_events: Arc<dyn SessionAndUserEventRepository>,
    reminder_updater: Arc<StarReminderUpdater>,
    scheduler: TaskScheduler,
    result: Arc<MutableObservable<DataResult<AuthenticatedUserInfo>>>,
    subscription: Mutex<Option<Subscription>>,
}

impl ObserveUserAuthStateUseCase {
    pub fn new(
        auth: Arc<dyn AuthStateUserDataSource>,
        user_events: Arc<dyn SessionAndUserEventRepository>,
        reminder_updater: Arc<StarReminderUpdater>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            auth,
            user_events,
            reminder_updater,
            scheduler,
            result: Arc::new(MutableObservable::new()),
            subscription: Mutex::new(None),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<AuthenticatedUserInfo>> {
        self.result.observe()
    }

    /// Starts listening for auth changes. Repeated calls are harmless.
    pub fn execute(&self) {
        {
            let mut subscription = lock(&self.subscription);
            if subscription.is_none() {
                *subscription = Some(self.subscribe());
            }
        }
        self.auth.start_listening();
    }

    pub fn on_cleared(&self) {
        lock(&self.subscription).take();
        self.auth.clear_listener();
    }

    fn subscribe(&self) -> Subscription {
        let result = Arc::clone(&self.result);
        let user_events = Arc::clone(&self.user_events);
        let updater = Arc::clone(&self.reminder_updater);
        let scheduler = self.scheduler.clone();
        let mut current_uid: Option<String> = None;

        self.auth
            .observe_user_info()
            .subscribe(&self.scheduler, move |value| match value {
                DataResult::Success(Some(user)) => {
                    if current_uid.as_deref() != Some(user.uid.as_str()) {
                        info!(uid = %user.uid, "User changed");
                        current_uid = Some(user.uid.clone());
                        let user_events = Arc::clone(&user_events);
                        let updater = Arc::clone(&updater);
                        let uid = user.uid.clone();
                        scheduler.spawn(async move {
                            if let Err(e) =
                                reschedule_reminders(user_events.as_ref(), &updater, &uid).await
                            {
                                warn!(uid = %uid, error = %e, "Failed to reschedule reminders");
                            }
                        });
                    }
                    result.post(DataResult::Success(user));
                }
                DataResult::Success(None) => {
                    if current_uid.take().is_some() {
                        debug!("Signed out, cancelling reminders");
                        let updater = Arc::clone(&updater);
                        scheduler.spawn(async move {
                            if let Err(e) = updater.cancel_all().await {
                                warn!(error = %e, "Failed to cancel reminders");
                            }
                        });
                    }
                    result.clear();
                }
                DataResult::Error(e) => {
                    warn!(error = %e, "Auth state error");
                    result.post(DataResult::Error(e));
                }
                DataResult::Loading => result.post(DataResult::Loading),
            })
    }
}

async fn reschedule_reminders(
    user_events: &dyn SessionAndUserEventRepository,
    updater: &StarReminderUpdater,
    user_id: &str,
) -> Result<()> {
    updater.cancel_all().await?;
    let events = user_events.get_user_events(Some(user_id)).await?;
    let mut starred = Vec::new();
    for event in events.iter().filter(|event| event.is_starred) {
        match user_events.get_user_session(Some(user_id), &event.id).await {
            Ok(user_session) => starred.push(user_session),
            Err(e) if e.is_not_found() => continue,
            Err(e) => return Err(e),
        }
    }
    updater.update_all(&starred).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, WAIT, star};
    use chrono::Duration;
    use confsched_infrastructure::LocalAuthStateUserDataSource;
    use tokio::time::timeout;

    async fn wait_until<F: Fn() -> bool>(condition: F) {
        timeout(WAIT, async {
            while !condition() {
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    fn use_case(
        fixture: &Fixture,
        auth: Arc<LocalAuthStateUserDataSource>,
    ) -> ObserveUserAuthStateUseCase {
        let updater = StarReminderUpdater::new(
            fixture.reminders.clone(),
            fixture.clock.clone(),
            Duration::minutes(5),
        );
        ObserveUserAuthStateUseCase::new(
            auth,
            fixture.user_sessions.clone(),
            Arc::new(updater),
            fixture.scheduler.clone(),
        )
    }

    #[tokio::test]
    async fn test_sign_in_publishes_user_and_restores_reminders() {
        let fixture = Fixture::new().await;
        star(&fixture, "u1", "web_1", true).await;
        star(&fixture, "u1", "android_2", true).await;

        let auth = Arc::new(LocalAuthStateUserDataSource::new());
        let use_case = use_case(&fixture, auth.clone());
        let mut observable = use_case.observe();
        use_case.execute();

        auth.sign_in(AuthenticatedUserInfo::new("u1"));
        let user = timeout(WAIT, observable.wait_for(DataResult::is_success))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.success().unwrap().uid, "u1");

        let reminders = fixture.reminders.clone();
        wait_until(|| reminders.scheduled().len() == 2).await;
    }

    #[tokio::test]
    async fn test_sign_out_clears_user_and_reminders() {
        let fixture = Fixture::new().await;
        star(&fixture, "u1", "web_1", true).await;

        let auth = Arc::new(LocalAuthStateUserDataSource::new());
        let use_case = use_case(&fixture, auth.clone());
        let mut observable = use_case.observe();
        auth.sign_in(AuthenticatedUserInfo::new("u1"));
        use_case.execute();

        timeout(WAIT, observable.wait_for(DataResult::is_success))
            .await
            .unwrap()
            .unwrap();
        let reminders = fixture.reminders.clone();
        wait_until(|| reminders.scheduled().len() == 1).await;

        auth.sign_out();
        let observer = observable.clone();
        wait_until(|| observer.value().is_none()).await;
        wait_until(|| reminders.scheduled().is_empty()).await;
    }

    #[tokio::test]
    async fn test_on_cleared_stops_updates() {
        let fixture = Fixture::new().await;
        let auth = Arc::new(LocalAuthStateUserDataSource::new());
        let use_case = use_case(&fixture, auth.clone());
        let mut observable = use_case.observe();
        use_case.execute();

        auth.sign_in(AuthenticatedUserInfo::new("u1"));
        timeout(WAIT, observable.wait_for(DataResult::is_success))
            .await
            .unwrap()
            .unwrap();

        use_case.on_cleared();
        auth.sign_in(AuthenticatedUserInfo::new("u2"));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(observable.value().unwrap().success().unwrap().uid, "u1");
    }
}
