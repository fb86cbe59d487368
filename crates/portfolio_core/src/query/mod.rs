//! Read-side filtering, searching and sorting for collection views.
//!
//! # Responsibility
//! - Compute view lists from a provider's collection on read; nothing here
//!   is stored.
//!
//! # Invariants
//! - Filter and search combine with logical AND; sorting runs last.
//! - Every sort is stable: ties keep collection order.
//! - Search is a case-insensitive substring match over title, the secondary
//!   text field and the tag list; any field matching is enough.

use crate::model::certificate::Certificate;
use crate::model::project::Project;
use crate::model::Resource;
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Sentinel filter value selecting every record.
pub const FILTER_ALL: &str = "all";
/// Sentinel filter value selecting featured records.
pub const FILTER_FEATURED: &str = "featured";

/// Fields the query layer reads from a record.
pub trait Queryable: Resource {
    /// Category tag, when the record has one.
    fn category(&self) -> Option<&str>;
    /// Secondary descriptive text searched after the title.
    fn secondary_text(&self) -> &str;
    /// Canonical technologies/skills.
    fn tags(&self) -> &[String];
    /// Date used for recency, if any.
    fn date(&self) -> Option<&str>;
}

impl Queryable for Project {
    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn secondary_text(&self) -> &str {
        &self.description
    }

    fn tags(&self) -> &[String] {
        &self.technologies
    }

    fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

impl Queryable for Certificate {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn secondary_text(&self) -> &str {
        &self.issuer
    }

    fn tags(&self) -> &[String] {
        &self.skills
    }

    fn date(&self) -> Option<&str> {
        Some(self.date_issued.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Featured,
    /// Exact, case-sensitive category match.
    Category(String),
}

impl CategoryFilter {
    /// Parses the identifier a view passes: `all`, `featured` or a category.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(FILTER_ALL) {
            Self::All
        } else if trimmed.eq_ignore_ascii_case(FILTER_FEATURED) {
            Self::Featured
        } else {
            Self::Category(trimmed.to_string())
        }
    }

    pub fn matches<R: Queryable>(&self, record: &R) -> bool {
        match self {
            Self::All => true,
            Self::Featured => record.is_featured(),
            Self::Category(category) => record.category() == Some(category.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Stable partition: featured records first.
    FeaturedFirst,
    /// Case-insensitive by title.
    Alphabetical,
}

impl SortOrder {
    /// Parses a view's sort identifier; unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" | "newest-first" | "recent" => Some(Self::Newest),
            "oldest" | "oldest-first" => Some(Self::Oldest),
            "featured" | "featured-first" => Some(Self::FeaturedFirst),
            "alphabetical" | "title" | "a-z" => Some(Self::Alphabetical),
            _ => None,
        }
    }
}

/// One view query over a collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionQuery {
    pub filter: CategoryFilter,
    /// Blank or `None` disables search.
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl CollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: &str) -> Self {
        self.filter = CategoryFilter::parse(filter);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Applies filter AND search, then sort.
    pub fn apply<R: Queryable>(&self, items: &[R]) -> Vec<R> {
        let term = self
            .search
            .as_deref()
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());

        let mut matched: Vec<R> = items
            .iter()
            .filter(|record| self.filter.matches(*record))
            .filter(|record| {
                term.as_deref()
                    .map_or(true, |term| matches_search(*record, term))
            })
            .cloned()
            .collect();
        sort_records(&mut matched, self.sort);
        matched
    }
}

/// Case-insensitive match of an already lowercased term.
fn matches_search<R: Queryable>(record: &R, lowered_term: &str) -> bool {
    let contains = |value: &str| value.to_lowercase().contains(lowered_term);
    contains(record.title())
        || contains(record.secondary_text())
        || record.tags().iter().any(|tag| contains(tag))
}

/// Returns whether `record` matches a free-text `term` (any case).
pub fn matches_term<R: Queryable>(record: &R, term: &str) -> bool {
    let lowered = term.trim().to_lowercase();
    lowered.is_empty() || matches_search(record, &lowered)
}

/// Sorts in place with a stable sort.
pub fn sort_records<R: Queryable>(items: &mut [R], order: SortOrder) {
    match order {
        SortOrder::Newest => items.sort_by_cached_key(|record| {
            let key = recency_key(record);
            (key.is_none(), Reverse(key))
        }),
        SortOrder::Oldest => items.sort_by_cached_key(|record| {
            let key = recency_key(record);
            (key.is_none(), key)
        }),
        SortOrder::FeaturedFirst => items.sort_by_key(|record| !record.is_featured()),
        SortOrder::Alphabetical => {
            items.sort_by_cached_key(|record| record.title().to_lowercase());
        }
    }
}

/// Recency key: parsed date when present, else numeric id.
///
/// Records with no usable key sort after every keyed record in both
/// directions and keep their relative order.
fn recency_key<R: Queryable>(record: &R) -> Option<(i64, i64)> {
    let date = record.date().and_then(parse_date);
    let id = record.id().as_number();
    match (date, id) {
        (Some(days), id) => Some((days, id.unwrap_or(0))),
        // Why: an undated record only has its id to go on, so it ranks older
        // than any dated one instead of interleaving ids with day counts.
        (None, Some(id)) => Some((i64::MIN, id)),
        (None, None) => None,
    }
}

/// Parses `YYYY-MM-DD`, `YYYY-MM` or `YYYY` into days since the CE epoch.
fn parse_date(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let candidates = [
        trimmed.to_string(),
        format!("{trimmed}-01"),
        format!("{trimmed}-01-01"),
    ];
    candidates
        .iter()
        .find_map(|candidate| NaiveDate::parse_from_str(candidate, "%Y-%m-%d").ok())
        .map(|date| i64::from(chrono::Datelike::num_days_from_ce(&date)))
}

/// Record counts per filter tab: `all`, `featured` and each category.
pub fn category_counts<R: Queryable>(items: &[R]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    counts.insert(FILTER_ALL.to_string(), items.len());
    counts.insert(
        FILTER_FEATURED.to_string(),
        items.iter().filter(|record| record.is_featured()).count(),
    );
    for category in items.iter().filter_map(|record| record.category()) {
        if category.is_empty() {
            continue;
        }
        *counts.entry(category.to_string()).or_insert(0) += 1;
    }
    counts
}
