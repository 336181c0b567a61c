//! Core domain of the conference schedule.
//!
//! This crate holds the catalog and per-user models, the session filter,
//! the observable primitives the merge pipeline is built on, and the
//! repository traits implemented by `confsched-infrastructure`.

pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod observable;
pub mod repository;
pub mod result;
pub mod scheduler;
pub mod sync;
pub mod time;

// Re-export common types
pub use error::{Result, ScheduleError};
pub use observable::{MutableObservable, Observable, Subscription};
pub use result::DataResult;
pub use scheduler::TaskScheduler;
