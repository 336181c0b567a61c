//! Tagged result values delivered through observables.

use crate::error::{Result, ScheduleError};

/// The state of an asynchronous load as seen by observers.
///
/// Unlike [`std::result::Result`] this has a third state, `Loading`, which
/// observers render as progress. Errors are values, never panics.
#[derive(Debug, Clone, PartialEq)]
pub enum DataResult<T> {
    Loading,
    Success(T),
    Error(ScheduleError),
}

impl<T> DataResult<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the success value, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ScheduleError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> DataResult<&T> {
        match self {
            Self::Loading => DataResult::Loading,
            Self::Success(data) => DataResult::Success(data),
            Self::Error(err) => DataResult::Error(err.clone()),
        }
    }

    pub fn map<U, F>(self, f: F) -> DataResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Loading => DataResult::Loading,
            Self::Success(data) => DataResult::Success(f(data)),
            Self::Error(err) => DataResult::Error(err),
        }
    }

    pub fn and_then<U, F>(self, f: F) -> DataResult<U>
    where
        F: FnOnce(T) -> DataResult<U>,
    {
        match self {
            Self::Loading => DataResult::Loading,
            Self::Success(data) => f(data),
            Self::Error(err) => DataResult::Error(err),
        }
    }

    /// Pairs two results. An error on either side wins over loading.
    pub fn zip<U>(self, other: DataResult<U>) -> DataResult<(T, U)> {
        match (self, other) {
            (Self::Error(err), _) | (_, DataResult::Error(err)) => DataResult::Error(err),
            (Self::Success(a), DataResult::Success(b)) => DataResult::Success((a, b)),
            _ => DataResult::Loading,
        }
    }
}

impl<T> From<Result<T>> for DataResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => Self::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_prefers_error() {
        let loading: DataResult<u32> = DataResult::Loading;
        let failed: DataResult<u32> = DataResult::Error(ScheduleError::internal("boom"));
        assert!(loading.zip(failed).is_error());
    }

    #[test]
    fn test_zip_waits_for_both() {
        let a = DataResult::Success(1);
        let b: DataResult<u32> = DataResult::Loading;
        assert!(a.zip(b).is_loading());
        assert_eq!(
            DataResult::Success(1).zip(DataResult::Success("x")),
            DataResult::Success((1, "x"))
        );
    }

    #[test]
    fn test_from_result() {
        let ok: DataResult<u8> = Ok(3).into();
        assert_eq!(ok.success(), Some(&3));
        let err: DataResult<u8> = Err(ScheduleError::session_not_found("x")).into();
        assert!(err.error().is_some_and(ScheduleError::is_not_found));
    }
}
