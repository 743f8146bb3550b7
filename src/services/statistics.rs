use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::BookRecord;

/// Aggregate attribute figures for the active catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStatistics {
    pub total_books: usize,
    pub avg_pace: f64,
    pub avg_complexity: f64,
    /// Attribute value to number of books with it
    pub pace_distribution: BTreeMap<u8, usize>,
    pub complexity_distribution: BTreeMap<u8, usize>,
}

impl CatalogStatistics {
    /// Returns `None` for an empty catalog
    pub fn from_books(books: &[BookRecord]) -> Option<Self> {
        if books.is_empty() {
            return None;
        }

        let total = books.len();
        let mut pace_distribution = BTreeMap::new();
        let mut complexity_distribution = BTreeMap::new();
        let mut pace_sum = 0u64;
        let mut complexity_sum = 0u64;

        for book in books {
            *pace_distribution.entry(book.pace).or_insert(0) += 1;
            *complexity_distribution.entry(book.complexity).or_insert(0) += 1;
            pace_sum += u64::from(book.pace);
            complexity_sum += u64::from(book.complexity);
        }

        Some(Self {
            total_books: total,
            avg_pace: pace_sum as f64 / total as f64,
            avg_complexity: complexity_sum as f64 / total as f64,
            pace_distribution,
            complexity_distribution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_catalog_has_no_statistics() {
        assert_eq!(CatalogStatistics::from_books(&[]), None);
    }

    #[test]
    fn test_statistics() {
        let books = vec![
            BookRecord::new(1, "A", "X", 5, 1, 2),
            BookRecord::new(2, "B", "Y", 3, 4, 3),
            BookRecord::new(3, "C", "Z", 5, 4, 5),
        ];

        let stats = CatalogStatistics::from_books(&books).unwrap();
        assert_eq!(stats.total_books, 3);
        assert_relative_eq!(stats.avg_pace, 13.0 / 3.0);
        assert_relative_eq!(stats.avg_complexity, 3.0);
        assert_eq!(stats.pace_distribution, BTreeMap::from([(3, 1), (5, 2)]));
        assert_eq!(
            stats.complexity_distribution,
            BTreeMap::from([(1, 1), (4, 2)])
        );
    }
}
