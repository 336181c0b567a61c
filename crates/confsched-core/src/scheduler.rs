//! The shared background execution context.
//!
//! Merges, mapping of repository results and remote mutations all run on a
//! `TaskScheduler` handed to each component by its constructor. There is no
//! process-wide default instance.

use crate::error::{Result, ScheduleError};
use std::future::Future;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct TaskScheduler {
    handle: Handle,
}

impl TaskScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Captures the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| ScheduleError::internal(format!("No tokio runtime available: {}", e)))
    }

    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_without_runtime_fails() {
        assert!(TaskScheduler::current().is_err());
    }

    #[tokio::test]
    async fn test_spawn_runs_on_captured_runtime() {
        let scheduler = TaskScheduler::current().unwrap();
        let value = scheduler.spawn(async { 40 + 2 }).await.unwrap();
        assert_eq!(value, 42);
    }
}
