use confsched_core::model::{RequestResultStatus, ReservationRequestAction, SessionId};
use confsched_core::observable::{Mediator, Observable};
use confsched_core::repository::SessionAndUserEventRepository;
use confsched_core::{DataResult, TaskScheduler};
use std::sync::Arc;
use tracing::debug;

/// Requests or cancels a reservation.
pub struct ReservationActionUseCase {
    repository: Arc<dyn SessionAndUserEventRepository>,
    scheduler: TaskScheduler,
    result: Mediator<DataResult<RequestResultStatus>>,
}

impl ReservationActionUseCase {
    pub fn new(
        repository: Arc<dyn SessionAndUserEventRepository>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            repository,
            scheduler,
            result: Mediator::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<RequestResultStatus>> {
        self.result.observe()
    }

    pub fn execute(&self, user_id: &str, session_id: &SessionId, action: ReservationRequestAction) {
        debug!(user_id, session_id = %session_id, ?action, "Changing reservation");
        let source = self
            .repository
            .change_reservation(user_id, session_id, action);
        self.result.add_source(&self.scheduler, source, Some);
    }
}

/// Moves a reservation from one session to another in one request.
pub struct SwapActionUseCase {
    repository: Arc<dyn SessionAndUserEventRepository>,
    scheduler: TaskScheduler,
    result: Mediator<DataResult<RequestResultStatus>>,
}

impl SwapActionUseCase {
    pub fn new(
        repository: Arc<dyn SessionAndUserEventRepository>,
        scheduler: TaskScheduler,
    ) -> Self {
        Self {
            repository,
            scheduler,
            result: Mediator::new(),
        }
    }

    pub fn observe(&self) -> Observable<DataResult<RequestResultStatus>> {
        self.result.observe()
    }

    pub fn execute(&self, user_id: &str, from_session_id: &SessionId, to_session_id: &SessionId) {
        debug!(user_id, from = %from_session_id, to = %to_session_id, "Swapping reservation");
        let source = self
            .repository
            .swap_reservation(user_id, from_session_id, to_session_id);
        self.result.add_source(&self.scheduler, source, Some);
    }
}
