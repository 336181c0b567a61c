//! Tag domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub type TagId = String;

/// The group a tag belongs to.
///
/// The declaration order is the order categories are listed in when tags
/// are shown grouped by category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TagCategory {
    Level,
    Topic,
    Type,
}

/// Describes a session: its topic, its type (talk, codelab, ...) or its level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Unique string identifying this tag.
    pub id: TagId,
    pub category: TagCategory,
    /// Machine name within the category, e.g. `type_codelabs`.
    pub tag_name: String,
    /// Ordering weight within the category, lower first.
    pub order_in_category: i32,
    pub display_name: String,
    /// Color as `#RRGGBB`, if the tag has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Tag {
    pub fn is_type(&self) -> bool {
        self.category == TagCategory::Type
    }
}
