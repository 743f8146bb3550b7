use std::collections::{BTreeSet, HashMap};

use crate::{
    config::AttributePolicy,
    error::{AppError, AppResult},
    models::{BookId, BookRecord, BookRow, MoodTag, TagId, ATTRIBUTE_MAX, ATTRIBUTE_MIN},
};

/// Read-only access to the book catalog
///
/// Implementations only read; they never mutate the catalog. Errors are
/// surfaced to the caller as-is, there is no retry at this layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All books flagged active, in catalog order, with their tag ids resolved
    async fn list_active_books(&self) -> AppResult<Vec<BookRow>>;

    /// The full mood tag dictionary
    async fn list_mood_tags(&self) -> AppResult<Vec<MoodTag>>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Resolves tag identifiers into display names
pub trait TagNameResolver {
    fn tag_name(&self, id: TagId) -> Option<&str>;

    /// Display names of every resolvable id, unknown ids are skipped
    fn tag_names<'a, I>(&'a self, ids: I) -> BTreeSet<&'a str>
    where
        I: IntoIterator<Item = &'a TagId>,
    {
        ids.into_iter().filter_map(|id| self.tag_name(*id)).collect()
    }
}

impl TagNameResolver for HashMap<TagId, String> {
    fn tag_name(&self, id: TagId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

/// Catalog held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    books: Vec<BookRow>,
    tags: Vec<MoodTag>,
}

impl InMemoryCatalog {
    pub fn new(books: Vec<BookRow>, tags: Vec<MoodTag>) -> Self {
        Self { books, tags }
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_active_books(&self) -> AppResult<Vec<BookRow>> {
        Ok(self.books.clone())
    }

    async fn list_mood_tags(&self) -> AppResult<Vec<MoodTag>> {
        Ok(self.tags.clone())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

/// Immutable view of the catalog at load time
///
/// Built once by [`load_snapshot`] and then only read, so it can be shared
/// across concurrent requests behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    books: Vec<BookRecord>,
    tags: HashMap<TagId, String>,
}

impl CatalogSnapshot {
    pub fn new(books: Vec<BookRecord>, tags: impl IntoIterator<Item = MoodTag>) -> Self {
        Self {
            books,
            tags: tags.into_iter().map(|t| (t.id, t.name)).collect(),
        }
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn book(&self, id: BookId) -> Option<&BookRecord> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl TagNameResolver for CatalogSnapshot {
    fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tags.get(&id).map(String::as_str)
    }
}

/// Reads the store and builds a snapshot of all active books
pub async fn load_snapshot(
    store: &dyn CatalogStore,
    policy: AttributePolicy,
) -> AppResult<CatalogSnapshot> {
    let rows = store.list_active_books().await?;
    let tags = store.list_mood_tags().await?;

    let books = rows
        .into_iter()
        .map(|row| to_record(row, policy))
        .collect::<AppResult<Vec<_>>>()?;

    tracing::debug!(
        store = store.name(),
        books = books.len(),
        tags = tags.len(),
        "Catalog snapshot loaded"
    );

    Ok(CatalogSnapshot::new(books, tags))
}

/// Converts a raw row, applying the attribute policy
pub fn to_record(row: BookRow, policy: AttributePolicy) -> AppResult<BookRecord> {
    let pace = attribute(row.id, "pace", row.pace, policy)?;
    let complexity = attribute(row.id, "complexity", row.complexity, policy)?;
    let emotional_intensity =
        attribute(row.id, "emotional_intensity", row.emotional_intensity, policy)?;

    let average_rating = if row.average_rating.is_finite() {
        row.average_rating.clamp(0.0, 5.0)
    } else {
        0.0
    };

    Ok(BookRecord {
        id: row.id,
        title: row.title,
        author: row.author,
        pace,
        complexity,
        emotional_intensity,
        page_count: row.page_count.and_then(|p| u32::try_from(p).ok()),
        mood_tag_ids: row.mood_tag_ids.into_iter().collect(),
        average_rating,
    })
}

fn attribute(
    book_id: BookId,
    name: &'static str,
    value: i32,
    policy: AttributePolicy,
) -> AppResult<u8> {
    let (min, max) = (i32::from(ATTRIBUTE_MIN), i32::from(ATTRIBUTE_MAX));
    if (min..=max).contains(&value) {
        return Ok(value as u8);
    }

    match policy {
        AttributePolicy::Reject => Err(AppError::InvalidAttribute {
            book_id,
            attribute: name,
            value: i64::from(value),
        }),
        AttributePolicy::Clamp => {
            tracing::warn!(
                book_id,
                attribute = name,
                value,
                "Attribute out of range, clamping"
            );
            Ok(value.clamp(min, max) as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: BookId, pace: i32, complexity: i32) -> BookRow {
        BookRow {
            id,
            title: format!("Book {}", id),
            author: "Anon".to_string(),
            pace,
            complexity,
            emotional_intensity: 3,
            page_count: Some(320),
            mood_tag_ids: vec![1, 2],
            average_rating: 4.0,
        }
    }

    fn tags() -> Vec<MoodTag> {
        vec![
            MoodTag {
                id: 2,
                name: "calm".to_string(),
            },
            MoodTag {
                id: 1,
                name: "adventurous".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_load_snapshot_keeps_catalog_order() {
        let store = InMemoryCatalog::new(vec![row(3, 3, 3), row(1, 4, 2)], tags());
        let snapshot = load_snapshot(&store, AttributePolicy::Clamp).await.unwrap();

        let ids: Vec<BookId> = snapshot.books().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(snapshot.tag_name(2), Some("calm"));
        assert_eq!(snapshot.book(1).unwrap().pace, 4);
    }

    #[test]
    fn test_load_snapshot_empty_catalog() {
        let store = InMemoryCatalog::default();
        let snapshot =
            tokio_test::block_on(load_snapshot(&store, AttributePolicy::Clamp)).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.tag_name(1), None);
    }

    #[test]
    fn test_clamp_policy_clamps_out_of_range() {
        let record = to_record(row(1, 9, 0), AttributePolicy::Clamp).unwrap();
        assert_eq!(record.pace, 5);
        assert_eq!(record.complexity, 1);
    }

    #[test]
    fn test_reject_policy_rejects_out_of_range() {
        let err = to_record(row(4, 3, 7), AttributePolicy::Reject).unwrap_err();
        match err {
            AppError::InvalidAttribute {
                book_id,
                attribute,
                value,
            } => {
                assert_eq!(book_id, 4);
                assert_eq!(attribute, "complexity");
                assert_eq!(value, 7);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rating_and_page_count_sanitised() {
        let mut raw = row(1, 3, 3);
        raw.average_rating = 7.5;
        raw.page_count = Some(-10);
        let record = to_record(raw, AttributePolicy::Reject).unwrap();
        assert_eq!(record.average_rating, 5.0);
        assert_eq!(record.page_count, None);

        let mut raw = row(2, 3, 3);
        raw.average_rating = f64::NAN;
        let record = to_record(raw, AttributePolicy::Clamp).unwrap();
        assert_eq!(record.average_rating, 0.0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCatalogStore::new();
        store
            .expect_list_active_books()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolTimedOut)));
        store.expect_list_mood_tags().never();
        store.expect_name().return_const("mock");

        let err = load_snapshot(&store, AttributePolicy::Clamp)
            .await
            .unwrap_err();
        assert!(err.is_data_access());
    }

    #[tokio::test]
    async fn test_load_snapshot_from_mock_store() {
        let mut store = MockCatalogStore::new();
        store
            .expect_list_active_books()
            .times(1)
            .returning(|| Ok(vec![row(10, 2, 2)]));
        store.expect_list_mood_tags().times(1).returning(|| Ok(tags()));
        store.expect_name().return_const("mock");

        let snapshot = load_snapshot(&store, AttributePolicy::Clamp).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.tag_name(1), Some("adventurous"));
        assert_eq!(snapshot.tag_name(2), Some("calm"));
    }

    #[test]
    fn test_tag_names_skip_unknown_ids() {
        let resolver: HashMap<TagId, String> =
            [(1, "calm".to_string()), (2, "sad".to_string())].into();
        let names = resolver.tag_names(&[2, 1, 99]);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["calm", "sad"]);
    }
}
