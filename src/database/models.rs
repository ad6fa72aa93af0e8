use serde::{Deserialize, Serialize};

use crate::value::Record;

/// One accepted, persisted form record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub data: Record,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Row as stored: `data` is the JSON text of the record
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SubmissionRow {
    pub id: String,
    pub data: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Only "asc" sorts ascending; anything else is descending
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Raw `GET /submissions` query string. Values stay strings so malformed
/// numbers fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    /// Build from decoded query pairs; the first occurrence of a key wins
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                "sortOrder" => &mut params.sort_order,
                "search" => &mut params.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_order: SortOrder,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: ListQuery::DEFAULT_LIMIT,
            sort_order: SortOrder::Desc,
            search: None,
        }
    }
}

impl ListQuery {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn from_params(params: &ListParams, default_limit: u32) -> Self {
        Self {
            page: parse_positive(params.page.as_deref()).unwrap_or(1),
            limit: parse_positive(params.limit.as_deref()).unwrap_or(default_limit.max(1)),
            sort_order: SortOrder::parse(params.sort_order.as_deref()),
            search: params.search.clone().filter(|s| !s.is_empty()),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Leading-integer parse ("2abc" → 2); zero, negative or missing → None
fn parse_positive(s: Option<&str>) -> Option<u32> {
    let t = s?.trim_start();
    let digits: String = t
        .strip_prefix('+')
        .unwrap_or(t)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

/// One page of a listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, query: &ListQuery) -> Self {
        let limit = u64::from(query.limit.max(1));
        Self {
            items,
            total,
            page: query.page,
            limit: query.limit,
            total_pages: total.div_ceil(limit),
        }
    }
}
