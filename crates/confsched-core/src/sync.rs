//! Small helpers around `std::sync` primitives.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the guard if a previous holder panicked.
///
/// None of the guarded state in this workspace can be left half-updated by a
/// panic, so a poisoned lock is safe to reuse.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
