use crate::model::Tag;

/// One checkable entry of the filter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Only starred or reserved sessions.
    MyEvents { checked: bool },
    Tag { tag: Tag, checked: bool },
}

impl EventFilter {
    pub fn is_checked(&self) -> bool {
        match self {
            Self::MyEvents { checked } | Self::Tag { checked, .. } => *checked,
        }
    }

    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Self::MyEvents { .. } => None,
            Self::Tag { tag, .. } => Some(tag),
        }
    }

    /// The label shown for this entry; `None` for the built-in "my events".
    pub fn display_name(&self) -> Option<&str> {
        self.tag().map(|tag| tag.display_name.as_str())
    }
}
