//! Tag listing, the filter list and the saved filter selection.

use confsched_core::Result;
use confsched_core::filter::{EventFilter, UserSessionMatcher};
use confsched_core::model::{Tag, TagCategory};
use confsched_core::repository::{PreferenceStorage, PreferenceUpdate, TagRepository};
use std::sync::Arc;
use tracing::debug;

/// Categories offered as filters, in display order.
const FILTER_CATEGORIES: [TagCategory; 2] = [TagCategory::Topic, TagCategory::Type];

/// Every tag, grouped by category and ordered within each category.
pub struct LoadTagsByCategoryUseCase {
    tags: Arc<dyn TagRepository>,
}

impl LoadTagsByCategoryUseCase {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    pub async fn execute(&self) -> Result<Vec<Tag>> {
        let mut tags = self.tags.get_tags().await?;
        tags.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.order_in_category.cmp(&b.order_in_category))
        });
        Ok(tags)
    }
}

/// Builds the checkable filter list: "my events" first, then one block of
/// tags per filter category.
pub struct LoadEventFiltersUseCase {
    tags: Arc<dyn TagRepository>,
    columns: usize,
}

impl LoadEventFiltersUseCase {
    /// `columns` is the width of the grid the list is laid out in; blocks
    /// are reordered so each column reads top to bottom in tag order.
    pub fn new(tags: Arc<dyn TagRepository>, columns: usize) -> Self {
        Self {
            tags,
            columns: columns.max(1),
        }
    }

    pub async fn execute(&self, matcher: &UserSessionMatcher) -> Result<Vec<EventFilter>> {
        let tags = self.tags.get_tags().await?;

        let mut filters = vec![EventFilter::MyEvents {
            checked: matcher.show_pinned_events_only(),
        }];
        for category in FILTER_CATEGORIES {
            let mut block: Vec<Tag> = tags
                .iter()
                .filter(|tag| tag.category == category)
                .cloned()
                .collect();
            block.sort_by_key(|tag| tag.order_in_category);
            filters.extend(interleave(block, self.columns).into_iter().map(|tag| {
                let checked = matcher.is_selected(&tag);
                EventFilter::Tag { tag, checked }
            }));
        }

        debug!(count = filters.len(), "Loaded event filters");
        Ok(filters)
    }
}

/// Lays `items` out column by column, then reads them back row by row.
fn interleave<T>(items: Vec<T>, columns: usize) -> Vec<T> {
    if columns <= 1 || items.len() <= 1 {
        return items;
    }
    let rows = items.len().div_ceil(columns);
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(slots.len());
    for row in 0..rows {
        for column in 0..columns {
            if let Some(item) = slots.get_mut(column * rows + row).and_then(Option::take) {
                ordered.push(item);
            }
        }
    }
    ordered
}

/// Restores the matcher the user left behind.
pub struct LoadSelectedFiltersUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl LoadSelectedFiltersUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self) -> Result<UserSessionMatcher> {
        let preferences = self.preferences.load().await?;
        Ok(UserSessionMatcher::from_saved(preferences.selected_filters))
    }
}

pub struct SaveSelectedFiltersUseCase {
    preferences: Arc<dyn PreferenceStorage>,
}

impl SaveSelectedFiltersUseCase {
    pub fn new(preferences: Arc<dyn PreferenceStorage>) -> Self {
        Self { preferences }
    }

    pub async fn execute(&self, matcher: &UserSessionMatcher) -> Result<()> {
        self.preferences
            .update(PreferenceUpdate::SelectedFilters(matcher.to_saved()))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, tag, tag_by_id};
    use async_trait::async_trait;

    struct FixedTags(Vec<Tag>);

    #[async_trait]
    impl TagRepository for FixedTags {
        async fn get_tags(&self) -> Result<Vec<Tag>> {
            Ok(self.0.clone())
        }
    }

    fn names(filters: &[EventFilter]) -> Vec<&str> {
        filters
            .iter()
            .map(|f| f.display_name().unwrap_or("my events"))
            .collect()
    }

    #[tokio::test]
    async fn test_filters_put_my_events_then_topics_then_types() {
        let tags = FixedTags(vec![
            tag("codelabs", TagCategory::Type, 0),
            tag("web", TagCategory::Topic, 1),
            tag("android", TagCategory::Topic, 0),
        ]);
        let use_case = LoadEventFiltersUseCase::new(Arc::new(tags), 1);

        let filters = use_case.execute(&UserSessionMatcher::new()).await.unwrap();
        assert_eq!(names(&filters), vec!["my events", "android", "web", "codelabs"]);
        assert!(filters.iter().all(|f| !f.is_checked()));
    }

    #[tokio::test]
    async fn test_filters_reflect_matcher_state() {
        let fixture = Fixture::new().await;
        let use_case = LoadEventFiltersUseCase::new(fixture.tags.clone(), 1);
        let mut matcher = UserSessionMatcher::new();
        matcher.add(&tag_by_id("web"));
        matcher.set_show_pinned_events_only(true);

        let filters = use_case.execute(&matcher).await.unwrap();
        // Level tags are not offered as filters.
        assert_eq!(
            names(&filters),
            vec!["my events", "android", "web", "codelabs", "sessions", "keynote"]
        );
        let checked: Vec<&str> = filters
            .iter()
            .filter(|f| f.is_checked())
            .map(|f| f.display_name().unwrap_or("my events"))
            .collect();
        assert_eq!(checked, vec!["my events", "web"]);
    }

    #[tokio::test]
    async fn test_two_columns_interleave_each_block() {
        let tags = FixedTags(vec![
            tag("a", TagCategory::Topic, 0),
            tag("b", TagCategory::Topic, 1),
            tag("c", TagCategory::Topic, 2),
            tag("d", TagCategory::Topic, 3),
            tag("e", TagCategory::Topic, 4),
            tag("x", TagCategory::Type, 0),
            tag("y", TagCategory::Type, 1),
        ]);
        let use_case = LoadEventFiltersUseCase::new(Arc::new(tags), 2);

        let filters = use_case.execute(&UserSessionMatcher::new()).await.unwrap();
        assert_eq!(
            names(&filters),
            vec!["my events", "a", "d", "b", "e", "c", "x", "y"]
        );
    }

    #[test]
    fn test_interleave() {
        assert_eq!(interleave(vec![1, 2, 3, 4], 2), vec![1, 3, 2, 4]);
        assert_eq!(interleave(vec![1, 2, 3, 4, 5, 6, 7], 3), vec![1, 4, 7, 2, 5, 3, 6]);
        assert_eq!(interleave(vec![1, 2, 3], 1), vec![1, 2, 3]);
        assert_eq!(interleave(Vec::<i32>::new(), 2), Vec::<i32>::new());
    }

    #[tokio::test]
    async fn test_tags_by_category() {
        let fixture = Fixture::new().await;
        let use_case = LoadTagsByCategoryUseCase::new(fixture.tags.clone());
        let ids: Vec<String> = use_case
            .execute()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(
            ids,
            vec!["beginner", "android", "web", "codelabs", "sessions", "keynote"]
        );
    }

    #[tokio::test]
    async fn test_selected_filters_round_trip() {
        let fixture = Fixture::new().await;
        let save = SaveSelectedFiltersUseCase::new(fixture.preferences.clone());
        let load = LoadSelectedFiltersUseCase::new(fixture.preferences.clone());

        assert!(!load.execute().await.unwrap().has_any_filters());

        let mut matcher = UserSessionMatcher::new();
        matcher.add(&tag_by_id("android"));
        matcher.set_show_pinned_events_only(true);
        save.execute(&matcher).await.unwrap();

        let restored = load.execute().await.unwrap();
        assert_eq!(restored, matcher);
    }
}
