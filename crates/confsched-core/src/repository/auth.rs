use crate::model::AuthenticatedUserInfo;
use crate::observable::Observable;
use crate::result::DataResult;

/// Reports the identity provider's sign-in state.
pub trait AuthStateUserDataSource: Send + Sync {
    /// Starts forwarding auth changes to [`observe_user_info`](Self::observe_user_info).
    fn start_listening(&self);

    /// `Success(None)` means signed out.
    fn observe_user_info(&self) -> Observable<DataResult<Option<AuthenticatedUserInfo>>>;

    fn clear_listener(&self);
}
