use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::probe::probe_count;

/// Where pagination metadata may live, in lookup order.
pub const META_CONTAINERS: &[&str] = &[
    "",
    "data",
    "pagination",
    "data.pagination",
    "meta",
    "meta.paging",
    "meta.pagination",
];

/// Synonyms for the total item count.
pub const TOTAL_KEYS: &[&str] = &[
    "total",
    "count",
    "Total",
    "Count",
    "totalItems",
    "totalCount",
    "total_items",
    "total_count",
    "totalDocs",
];

/// Synonyms for the current page number.
pub const PAGE_KEYS: &[&str] = &["page", "Page", "currentPage", "current_page", "pageNumber"];

/// Synonyms for the page size.
pub const LIMIT_KEYS: &[&str] = &[
    "limit",
    "Limit",
    "pageSize",
    "page_size",
    "perPage",
    "per_page",
    "size",
];

/// Synonyms for the page count.
pub const TOTAL_PAGES_KEYS: &[&str] = &[
    "totalPages",
    "TotalPages",
    "total_pages",
    "pages",
    "pageCount",
    "page_count",
];

/// Pagination metadata a list endpoint may report next to its items.
///
/// Every field is optional; endpoints report any subset under varying names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPageMeta {
    pub total: Option<u64>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub total_pages: Option<u64>,
}

impl ServerPageMeta {
    /// Probes `body` for each field using the standard synonym lists.
    ///
    /// A zero `page` or `limit` is treated as absent.
    pub fn from_body(body: &Value) -> Self {
        Self {
            total: probe_count(body, META_CONTAINERS, TOTAL_KEYS),
            page: probe_count(body, META_CONTAINERS, PAGE_KEYS).filter(|p| *p > 0),
            limit: probe_count(body, META_CONTAINERS, LIMIT_KEYS).filter(|l| *l > 0),
            total_pages: probe_count(body, META_CONTAINERS, TOTAL_PAGES_KEYS),
        }
    }

    /// True when `page` and `limit` are known along with a total or a page count.
    pub fn is_sufficient(&self) -> bool {
        self.page.is_some()
            && self.limit.is_some()
            && (self.total.is_some() || self.total_pages.is_some())
    }

    /// The reported page count, or `ceil(total / limit)` when only those are known.
    pub fn resolved_total_pages(&self) -> Option<u64> {
        self.total_pages.or_else(|| match (self.total, self.limit) {
            (Some(total), Some(limit)) if limit > 0 => Some(total.div_ceil(limit)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn capitalized_synonyms_are_sufficient() {
        let meta = ServerPageMeta::from_body(&json!({"Total": 42, "Page": 3, "Limit": 10}));
        assert!(meta.is_sufficient());
        assert_eq!(meta.resolved_total_pages(), Some(5));
    }

    #[test]
    fn nested_pagination_block() {
        let body = json!({
            "data": {"products": []},
            "pagination": {"currentPage": "2", "perPage": 20, "totalItems": 41}
        });
        let meta = ServerPageMeta::from_body(&body);
        assert_eq!(meta.page, Some(2));
        assert_eq!(meta.limit, Some(20));
        assert_eq!(meta.total, Some(41));
        assert_eq!(meta.resolved_total_pages(), Some(3));
    }

    #[test]
    fn missing_limit_is_insufficient() {
        let meta = ServerPageMeta::from_body(&json!({"total": 10, "page": 1}));
        assert!(!meta.is_sufficient());
    }

    #[test]
    fn page_count_without_total_is_sufficient() {
        let meta = ServerPageMeta::from_body(&json!({"page": 1, "limit": 5, "totalPages": 4}));
        assert!(meta.is_sufficient());
        assert_eq!(meta.total, None);
        assert_eq!(meta.resolved_total_pages(), Some(4));
    }

    #[test]
    fn zero_limit_counts_as_absent() {
        let meta = ServerPageMeta::from_body(&json!({"total": 10, "page": 1, "limit": 0}));
        assert_eq!(meta.limit, None);
        assert!(!meta.is_sufficient());
    }

    #[test]
    fn bare_array_body_has_no_meta() {
        let meta = ServerPageMeta::from_body(&json!([{"_id": "a"}]));
        assert_eq!(meta, ServerPageMeta::default());
    }
}
