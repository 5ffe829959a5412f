//! Core types for the search domain.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    Date, OffsetDateTime, UtcOffset,
};

/// A course offering as stored in the `courses` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    /// Empty when the stored source has no id; the engine fills it from hit metadata.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Keyword field, matched exactly
    #[serde(default)]
    pub category: Option<String>,
    /// Keyword field: `ONE_TIME`, `COURSE` or `CLUB` in practice, but not restricted
    #[serde(rename = "type", default)]
    pub course_type: Option<String>,
    #[serde(default)]
    pub grade_range: Option<String>,
    #[serde(default)]
    pub min_age: Option<i32>,
    #[serde(default)]
    pub max_age: Option<i32>,
    #[serde(default)]
    pub price: Option<f64>,
    /// UTC timestamp, `yyyy-MM-ddTHH:mm:ssZ`
    #[serde(default)]
    pub next_session_date: Option<String>,
    /// Completion inputs for autocomplete
    #[serde(default)]
    pub suggest: Vec<String>,
}

/// Document fields the query layer refers to, by their index name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
#[strum(serialize_all = "camelCase")]
pub enum CourseField {
    Title,
    Description,
    Category,
    Type,
    GradeRange,
    MinAge,
    MaxAge,
    Price,
    NextSessionDate,
    Suggest,
}

/// A search request as received from the HTTP layer.
///
/// Every filter is optional; an absent filter is simply not applied.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub text: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub category: Option<String>,
    pub course_type: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Normalized to `yyyy-MM-ddTHH:mm:ssZ`
    pub start_date: Option<String>,
    pub sort: String,
    pub page: u32,
    pub size: u32,
}

pub const DEFAULT_SORT: &str = "upcoming";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            text: None,
            min_age: None,
            max_age: None,
            category: None,
            course_type: None,
            min_price: None,
            max_price: None,
            start_date: None,
            sort: DEFAULT_SORT.to_string(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchRequest {
    /// The free-text part, if it contains anything besides whitespace.
    pub fn search_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Number of hits to skip. Deep pages are not capped.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// Sort modes accepted in the `sort` parameter. Unknown tokens fall back to [`SortMode::Upcoming`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
pub enum SortMode {
    #[default]
    #[strum(serialize = "upcoming")]
    Upcoming,
    #[strum(serialize = "priceAsc")]
    PriceAsc,
    #[strum(serialize = "priceDesc")]
    PriceDesc,
}

impl SortMode {
    pub fn from_token(token: &str) -> Self {
        token.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Concrete sort key handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSort {
    pub field: CourseField,
    pub order: SortOrder,
}

/// Completion options grouped by suggester name, one entry per analyzed input token.
pub type SuggestionGroups = HashMap<String, Vec<SuggestionEntry>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionEntry {
    pub options: Vec<String>,
}

/// Outcome of an engine bulk write.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub indexed: usize,
    /// `(document id, reason)` for every rejected document
    pub failed: Vec<(String, String)>,
}

/// Statistics from a seed run.
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub read: usize,
    pub indexed: usize,
    pub failed: usize,
    pub index_created: bool,
}

const SESSION_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
const PLAIN_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parses a session date given as RFC 3339 or as a bare `yyyy-MM-dd` and renders it in the
/// fixed `yyyy-MM-ddTHH:mm:ssZ` form used by the index.
///
/// Returns `None` for anything else.
pub fn normalize_session_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let timestamp = match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(timestamp) => timestamp.to_offset(UtcOffset::UTC),
        Err(_) => Date::parse(raw, PLAIN_DATE_FORMAT)
            .ok()?
            .midnight()
            .assume_utc(),
    };

    timestamp.format(SESSION_DATE_FORMAT).ok()
}
