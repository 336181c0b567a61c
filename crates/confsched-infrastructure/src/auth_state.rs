//! Local sign-in state.

use confsched_core::DataResult;
use confsched_core::model::AuthenticatedUserInfo;
use confsched_core::observable::{MutableObservable, Observable};
use confsched_core::repository::AuthStateUserDataSource;
use confsched_core::sync::lock;
use std::sync::Mutex;
use tracing::info;

/// An identity source driven by explicit `sign_in` / `sign_out` calls.
///
/// Changes made before [`start_listening`](AuthStateUserDataSource::start_listening)
/// are held back and published once listening starts.
pub struct LocalAuthStateUserDataSource {
    current: Mutex<Option<AuthenticatedUserInfo>>,
    listening: Mutex<bool>,
    user_info: MutableObservable<DataResult<Option<AuthenticatedUserInfo>>>,
}

impl LocalAuthStateUserDataSource {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            listening: Mutex::new(false),
            user_info: MutableObservable::new(),
        }
    }

    pub fn sign_in(&self, user: AuthenticatedUserInfo) {
        info!(uid = %user.uid, "Signed in");
        *lock(&self.current) = Some(user);
        self.publish();
    }

    pub fn sign_out(&self) {
        info!("Signed out");
        *lock(&self.current) = None;
        self.publish();
    }

    fn publish(&self) {
        if *lock(&self.listening) {
            let current = lock(&self.current).clone();
            self.user_info.post(DataResult::Success(current));
        }
    }
}

impl Default for LocalAuthStateUserDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStateUserDataSource for LocalAuthStateUserDataSource {
    fn start_listening(&self) {
        *lock(&self.listening) = true;
        self.publish();
    }

    fn observe_user_info(&self) -> Observable<DataResult<Option<AuthenticatedUserInfo>>> {
        self.user_info.observe()
    }

    fn clear_listener(&self) {
        *lock(&self.listening) = false;
    }
}
