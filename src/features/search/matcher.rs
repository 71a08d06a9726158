//! Pure search, filter, and aggregation logic over a file-record snapshot.
//!
//! Every function here operates on an in-memory snapshot already fetched
//! for a single owner; nothing performs I/O or touches shared state, so
//! requests can run concurrently without coordination.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::files::models::FileRecord;
use crate::modules::storage::ContentCategory;

/// Coarse filter categories exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Images,
    Videos,
    Audios,
    Others,
}

impl Category {
    /// Whether a record with this content type passes the filter
    pub fn matches(&self, content_type: &str) -> bool {
        let category = ContentCategory::from_content_type(content_type);
        match self {
            Category::All => true,
            Category::Images => category == ContentCategory::Images,
            Category::Videos => category == ContentCategory::Videos,
            Category::Audios => category == ContentCategory::Audios,
            Category::Others => category == ContentCategory::Others,
        }
    }
}

/// A validated, case-folded free-text query.
///
/// Construction fails on empty or whitespace-only input; an empty query
/// must never silently match everything.
#[derive(Debug, Clone)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AppError::Validation("Search query is required".to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Derived keyword frequency for one owner's record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordStat {
    pub name: String,
    pub count: i64,
}

/// Normalize a keyword the same way at ingestion and aggregation time
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a keyword list for storage: trim, case-fold, drop empties
/// and duplicates while preserving first-seen order.
pub fn normalize_keywords(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|k| normalize_keyword(k))
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.clone()))
        .collect()
}

/// Whether a record matches the query: case-insensitive substring match
/// against the original filename or any keyword.
pub fn matches_query(record: &FileRecord, query: &SearchQuery) -> bool {
    if record
        .original_filename
        .to_lowercase()
        .contains(query.as_str())
    {
        return true;
    }
    record
        .keywords
        .iter()
        .any(|k| k.to_lowercase().contains(query.as_str()))
}

/// Filter a snapshot by a free-text query, preserving snapshot order.
/// An unchanged snapshot always yields the same sequence for the same query.
pub fn search_records(records: &[FileRecord], query: &SearchQuery) -> Vec<FileRecord> {
    records
        .iter()
        .filter(|r| matches_query(r, query))
        .cloned()
        .collect()
}

/// Filter a result sequence by category. Pure and idempotent; order is
/// preserved, so it commutes with `search_records` over the same base set.
pub fn filter_by_category(records: &[FileRecord], category: Category) -> Vec<FileRecord> {
    records
        .iter()
        .filter(|r| category.matches(&r.content_type))
        .cloned()
        .collect()
}

/// Aggregate keyword frequencies across a snapshot.
///
/// Each keyword is counted at most once per record, even if the record's
/// metadata mentions it several times. Entries are sorted by count
/// descending, then name ascending, and truncated to `top_n`.
pub fn aggregate_keywords(records: &[FileRecord], top_n: usize) -> Vec<KeywordStat> {
    let mut counts: HashMap<String, i64> = HashMap::new();

    for record in records {
        let mut seen_in_record = HashSet::new();
        for raw in &record.keywords {
            let name = normalize_keyword(raw);
            if name.is_empty() {
                continue;
            }
            if seen_in_record.insert(name.clone()) {
                *counts.entry(name).or_insert(0) += 1;
            }
        }
    }

    let mut stats: Vec<KeywordStat> = counts
        .into_iter()
        .map(|(name, count)| KeywordStat { name, count })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    stats.truncate(top_n);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(filename: &str, content_type: &str, keywords: &[&str]) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::nil(),
            file_key: format!("owner/others/{}", filename),
            original_filename: filename.to_string(),
            content_type: content_type.to_string(),
            file_size: 1,
            public_url: format!("http://localhost:9000/content-uploads/owner/{}", filename),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            summary: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_query_rejects_empty_input() {
        assert!(SearchQuery::parse("").is_err());
        assert!(SearchQuery::parse("   ").is_err());
        assert!(SearchQuery::parse("\t\n").is_err());
    }

    #[test]
    fn test_query_is_case_folded_and_trimmed() {
        let q = SearchQuery::parse("  CaT ").unwrap();
        assert_eq!(q.as_str(), "cat");
    }

    #[test]
    fn test_search_matches_filename_and_keywords() {
        let records = vec![
            record("a.png", "image/png", &["cat", "Cat"]),
            record("b.mp4", "video/mp4", &["dog"]),
        ];

        let q = SearchQuery::parse("cat").unwrap();
        let hits = search_records(&records, &q);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].original_filename, "a.png");

        // Substring match against the filename as well
        let q = SearchQuery::parse("b.mp").unwrap();
        let hits = search_records(&records, &q);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].original_filename, "b.mp4");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let records = vec![
            record("Holiday.PNG", "image/png", &["Beach"]),
            record("notes.txt", "text/plain", &["work"]),
        ];

        let upper = search_records(&records, &SearchQuery::parse("BEACH").unwrap());
        let lower = search_records(&records, &SearchQuery::parse("beach").unwrap());

        assert_eq!(upper.len(), 1);
        assert_eq!(
            upper.iter().map(|r| r.id).collect::<Vec<_>>(),
            lower.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_search_empty_snapshot_returns_empty() {
        let q = SearchQuery::parse("anything").unwrap();
        assert!(search_records(&[], &q).is_empty());
    }

    #[test]
    fn test_search_preserves_snapshot_order() {
        let records = vec![
            record("cat-1.png", "image/png", &[]),
            record("cat-2.png", "image/png", &[]),
            record("cat-3.png", "image/png", &[]),
        ];

        let q = SearchQuery::parse("cat").unwrap();
        let hits = search_records(&records, &q);
        let names: Vec<_> = hits.iter().map(|r| r.original_filename.clone()).collect();
        assert_eq!(names, vec!["cat-1.png", "cat-2.png", "cat-3.png"]);
    }

    #[test]
    fn test_category_filter() {
        let records = vec![
            record("a.png", "image/png", &[]),
            record("b.mp4", "video/mp4", &[]),
            record("c.mp3", "audio/mpeg", &[]),
            record("d.pdf", "application/pdf", &[]),
        ];

        let videos = filter_by_category(&records, Category::Videos);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].original_filename, "b.mp4");

        let others = filter_by_category(&records, Category::Others);
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].original_filename, "d.pdf");

        let all = filter_by_category(&records, Category::All);
        assert_eq!(all.len(), records.len());
    }

    #[test]
    fn test_category_filter_is_idempotent() {
        let records = vec![
            record("a.png", "image/png", &[]),
            record("b.mp4", "video/mp4", &[]),
        ];

        let once = filter_by_category(&records, Category::Images);
        let twice = filter_by_category(&once, Category::Images);

        assert_eq!(
            once.iter().map(|r| r.id).collect::<Vec<_>>(),
            twice.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_filter_commutes_with_search() {
        let records = vec![
            record("cat.png", "image/png", &["cat"]),
            record("cat.mp4", "video/mp4", &["cat"]),
            record("dog.png", "image/png", &["dog"]),
        ];

        let q = SearchQuery::parse("cat").unwrap();

        let search_then_filter =
            filter_by_category(&search_records(&records, &q), Category::Images);
        let filter_then_search =
            search_records(&filter_by_category(&records, Category::Images), &q);

        assert_eq!(
            search_then_filter.iter().map(|r| r.id).collect::<Vec<_>>(),
            filter_then_search.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_aggregate_counts_keyword_once_per_record() {
        // "cat" and "Cat" normalize to the same keyword within one record
        let records = vec![
            record("a.png", "image/png", &["cat", "Cat"]),
            record("b.mp4", "video/mp4", &["dog"]),
        ];

        let stats = aggregate_keywords(&records, 12);
        assert_eq!(
            stats,
            vec![
                KeywordStat {
                    name: "cat".to_string(),
                    count: 1
                },
                KeywordStat {
                    name: "dog".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_aggregate_sorts_by_count_then_name() {
        let records = vec![
            record("a.png", "image/png", &["beach", "sunset"]),
            record("b.png", "image/png", &["beach", "alps"]),
            record("c.png", "image/png", &["beach", "sunset"]),
        ];

        let stats = aggregate_keywords(&records, 12);
        let names: Vec<_> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["beach", "sunset", "alps"]);
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[1].count, 2);
        assert_eq!(stats[2].count, 1);
    }

    #[test]
    fn test_aggregate_truncates_to_top_n() {
        let records = vec![record(
            "a.png",
            "image/png",
            &["k1", "k2", "k3", "k4", "k5"],
        )];

        let stats = aggregate_keywords(&records, 3);
        assert_eq!(stats.len(), 3);
        // Ties broken alphabetically, so truncation is deterministic
        let names: Vec<_> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["k1", "k2", "k3"]);
    }

    #[test]
    fn test_aggregate_empty_snapshot() {
        assert!(aggregate_keywords(&[], 12).is_empty());
    }

    #[test]
    fn test_aggregate_skips_blank_keywords() {
        let records = vec![record("a.png", "image/png", &["  ", "", "cat"])];

        let stats = aggregate_keywords(&records, 12);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "cat");
    }

    #[test]
    fn test_normalize_keywords_dedupes_and_preserves_order() {
        let raw = vec![
            " Beach ".to_string(),
            "sunset".to_string(),
            "beach".to_string(),
            "".to_string(),
        ];

        assert_eq!(
            normalize_keywords(&raw),
            vec!["beach".to_string(), "sunset".to_string()]
        );
    }
}
