use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Primary key of a book in the catalog store
pub type BookId = i64;

/// Primary key of a mood tag in the catalog store
pub type TagId = i64;

/// Lowest value a pace/complexity/emotional intensity attribute may take
pub const ATTRIBUTE_MIN: u8 = 1;
/// Highest value a pace/complexity/emotional intensity attribute may take
pub const ATTRIBUTE_MAX: u8 = 5;

/// A catalog-defined label such as "calm" or "adventurous"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoodTag {
    pub id: TagId,
    pub name: String,
}

/// Raw book row as returned by a catalog store, before attribute validation
///
/// Attribute columns are plain integers here because the store does not
/// guarantee the [1, 5] range; conversion into [`BookRecord`] applies the
/// configured attribute policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRow {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub pace: i32,
    pub complexity: i32,
    pub emotional_intensity: i32,
    pub page_count: Option<i32>,
    pub mood_tag_ids: Vec<TagId>,
    pub average_rating: f64,
}

/// An active book with its scoring attributes
///
/// Attributes are guaranteed to lie in [1, 5] and the rating in [0, 5]
/// once a record has been produced by the snapshot loader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// 1 = slow, 5 = fast
    pub pace: u8,
    /// 1 = simple, 5 = demanding
    pub complexity: u8,
    pub emotional_intensity: u8,
    pub page_count: Option<u32>,
    pub mood_tag_ids: BTreeSet<TagId>,
    pub average_rating: f64,
}

impl BookRecord {
    /// Creates a record with no tags, no page count and a zero rating
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        pace: u8,
        complexity: u8,
        emotional_intensity: u8,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            pace,
            complexity,
            emotional_intensity,
            page_count: None,
            mood_tag_ids: BTreeSet::new(),
            average_rating: 0.0,
        }
    }

    pub fn with_rating(mut self, average_rating: f64) -> Self {
        self.average_rating = average_rating;
        self
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.mood_tag_ids = tag_ids.into_iter().collect();
        self
    }
}
