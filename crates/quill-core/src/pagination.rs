//! Pagination and sorting parameter normalization.
//!
//! Raw query parameters arrive as optional strings. Normalization is total:
//! absent, non-numeric, zero, and negative values all collapse to the
//! defaults, so listing code downstream never sees a page below 1 or a
//! limit below 1.

use serde::Serialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const DEFAULT_SORT_BY: &str = "createdAt";

/// Raw, possibly missing or malformed pagination parameters.
#[derive(Debug, Clone, Default)]
pub struct RawPageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Canonical pagination tuple. `skip` is always `(page - 1) * limit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
    pub skip: u64,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

impl Default for PageParams {
    fn default() -> Self {
        Self::normalize(RawPageParams::default())
    }
}

impl PageParams {
    /// Normalize raw parameters. Never fails.
    pub fn normalize(raw: RawPageParams) -> Self {
        let page = parse_positive(raw.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(raw.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);

        let sort_by = raw
            .sort_by
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SORT_BY.to_string());
        let sort_order = match raw.sort_order.as_deref() {
            Some(order) if order.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        Self {
            page,
            limit,
            skip: (page - 1) * limit,
            sort_by,
            sort_order,
        }
    }
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as u64)
}

/// Pagination envelope metadata for list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl PageMeta {
    /// `total_pages = ceil(total / limit)`; `limit` is >= 1 by construction.
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// A page of results together with its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(page: Option<&str>, limit: Option<&str>) -> RawPageParams {
        RawPageParams {
            page: page.map(String::from),
            limit: limit.map(String::from),
            sort_by: None,
            sort_order: None,
        }
    }

    #[test]
    fn empty_input_yields_defaults() {
        let params = PageParams::normalize(RawPageParams::default());
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.skip, 0);
        assert_eq!(params.sort_by, "createdAt");
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn zero_page_takes_default() {
        let params = PageParams::normalize(raw(Some("0"), Some("5")));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 5);
        assert_eq!(params.skip, 0);
    }

    #[test]
    fn negative_and_non_numeric_take_defaults() {
        for bad in ["-3", "abc", "", "  ", "1.5"] {
            let params = PageParams::normalize(raw(Some(bad), Some(bad)));
            assert_eq!(params.page, 1, "page for {bad:?}");
            assert_eq!(params.limit, 10, "limit for {bad:?}");
        }
    }

    #[test]
    fn skip_is_page_minus_one_times_limit() {
        let params = PageParams::normalize(raw(Some("3"), Some("7")));
        assert_eq!(params.skip, 14);
    }

    #[test]
    fn sort_order_parses_asc_case_insensitively() {
        let params = PageParams::normalize(RawPageParams {
            sort_order: Some("ASC".into()),
            ..Default::default()
        });
        assert_eq!(params.sort_order, SortOrder::Asc);

        let params = PageParams::normalize(RawPageParams {
            sort_order: Some("sideways".into()),
            ..Default::default()
        });
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(PageMeta::new(25, 1, 10).total_pages, 3);
        assert_eq!(PageMeta::new(30, 1, 10).total_pages, 3);
        assert_eq!(PageMeta::new(0, 1, 10).total_pages, 0);
        assert_eq!(PageMeta::new(1, 1, 10).total_pages, 1);
    }
}
