use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A fixed entry of the event agenda, shown outside the session catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub title: String,
    pub kind: String,
    /// Color as a packed `0xAARRGGBB` value.
    pub color: u32,
    #[serde(default)]
    pub stroke_color: Option<u32>,
    #[serde(default)]
    pub is_dark: bool,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
}

impl Block {
    pub fn is_within(&self, start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> bool {
        *start <= self.start_time && self.start_time < *end
    }
}
