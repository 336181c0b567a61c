//! Application configuration.
//!
//! Every field has a default, so an empty or missing config file describes
//! the built-in event.

use crate::error::{Result, ScheduleError};
use crate::model::ConferenceDay;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub conference: ConferenceConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reservations: ReservationConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
    #[serde(default)]
    pub filters: FilterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Checks the values serde cannot: day windows and the time-zone offset.
    pub fn validate(&self) -> Result<()> {
        self.conference.time_zone_offset()?;
        if self.conference.days.is_empty() {
            return Err(ScheduleError::config("conference.days must not be empty"));
        }
        for (index, day) in self.conference.days.iter().enumerate() {
            if day.start >= day.end {
                return Err(ScheduleError::config(format!(
                    "conference.days[{}] ends before it starts",
                    index
                )));
            }
        }
        if self.filters.columns == 0 {
            return Err(ScheduleError::config("filters.columns must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ConferenceConfig {
    #[serde(default = "default_conference_name")]
    pub name: String,
    /// Offset of the venue, e.g. `+05:30`.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_days")]
    pub days: Vec<DayWindow>,
}

impl ConferenceConfig {
    pub fn time_zone_offset(&self) -> Result<FixedOffset> {
        self.time_zone.parse::<FixedOffset>().map_err(|e| {
            ScheduleError::config(format!("Invalid time_zone '{}': {}", self.time_zone, e))
        })
    }

    pub fn conference_days(&self) -> Vec<ConferenceDay> {
        let mut days: Vec<ConferenceDay> = self
            .days
            .iter()
            .map(|window| ConferenceDay::new(window.start, window.end))
            .collect();
        days.sort();
        days
    }
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self {
            name: default_conference_name(),
            time_zone: default_time_zone(),
            days: default_days(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    /// Catalog JSON shipped with the app, used until a refresh succeeds.
    #[serde(default)]
    pub bootstrap_path: Option<PathBuf>,
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            bootstrap_path: None,
            remote_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageConfig {
    /// Preferences file; the platform config dir is used when unset.
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReservationConfig {
    /// Reservations and cancellations close this long before a session starts.
    #[serde(default = "default_cutoff_minutes")]
    pub cutoff_minutes: i64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            cutoff_minutes: default_cutoff_minutes(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ReminderConfig {
    #[serde(default = "default_lead_minutes")]
    pub lead_minutes: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            lead_minutes: default_lead_minutes(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Columns of the filter grid. Blocks are interleaved when above one.
    #[serde(default = "default_columns")]
    pub columns: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_conference_name() -> String {
    "Rich & Chanse".to_string()
}

fn default_time_zone() -> String {
    "+05:30".to_string()
}

fn default_days() -> Vec<DayWindow> {
    [
        ("2019-03-11T00:00:00+05:30", "2019-03-12T00:00:00+05:30"),
        ("2019-03-13T00:00:00+05:30", "2019-03-14T00:00:00+05:30"),
    ]
    .into_iter()
    .filter_map(|(start, end)| {
        Some(DayWindow {
            start: DateTime::parse_from_rfc3339(start).ok()?,
            end: DateTime::parse_from_rfc3339(end).ok()?,
        })
    })
    .collect()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_cutoff_minutes() -> i64 {
    60
}

fn default_lead_minutes() -> i64 {
    5
}

fn default_columns() -> usize {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}
