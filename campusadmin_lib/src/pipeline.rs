//! Turns a raw list body into a [`ResolvedPage`].
//!
//! When the body carries sufficient pagination metadata the server is
//! trusted to have filtered, sorted and sliced already. Otherwise the body is
//! taken as the whole collection and the search / filter / sort / slice
//! pipeline runs here.

use std::cmp::Ordering;

use campusadmin_api::types::probe::{lookup, scalar_text};
use campusadmin_api::types::{ListBody, ServerPageMeta};
use campusadmin_api::SortDirection;
use serde_json::Value;

use crate::page::{display_range, ResolvedPage};
use crate::profile::CollectionProfile;
use crate::state::{ItemsPerPage, QueryState};

/// Result of resolving one body against the state it was requested with.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub page: ResolvedPage,
    pub meta: ServerPageMeta,
    /// Size of the full collection as far as this response tells:
    /// the server total, or the unfiltered item count.
    pub known_total: u64,
    /// Set when no collection was found; the page is then empty.
    pub malformed: Option<String>,
}

/// Resolves `body` for `state` using `profile`'s paths and fields.
pub fn resolve(body: &ListBody, state: &QueryState, profile: &CollectionProfile) -> Resolution {
    let meta = body.page_meta();
    let paths = profile.collection_paths();

    let items = match body.items(&paths) {
        Some(items) => items,
        None => {
            return Resolution {
                page: ResolvedPage::empty(state.items_per_page()),
                meta,
                known_total: 0,
                malformed: Some(format!(
                    "no '{}' collection at {}",
                    profile.collection_key,
                    paths
                        .iter()
                        .map(|p| if p.is_empty() { "<body>" } else { p.as_str() })
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            }
        }
    };

    if meta.is_sufficient() {
        let page = server_page(items, &meta, state);
        let known_total = page.display_total;
        Resolution {
            page,
            meta,
            known_total,
            malformed: None,
        }
    } else {
        Resolution {
            page: client_page(items, state, profile),
            meta,
            known_total: items.len() as u64,
            malformed: None,
        }
    }
}

fn server_page(items: &[Value], meta: &ServerPageMeta, state: &QueryState) -> ResolvedPage {
    let page = meta.page.unwrap_or(1);
    let limit = meta.limit.unwrap_or(1);
    let total_pages = meta.resolved_total_pages().unwrap_or(0);
    let display_total = meta
        .total
        .unwrap_or_else(|| total_pages.saturating_mul(limit));
    let (display_from, display_to) =
        display_range(page, limit, items.len() as u64, display_total);

    ResolvedPage {
        items: items.to_vec(),
        display_from,
        display_to,
        display_total,
        total_pages,
        using_server_pagination: true,
        page,
        items_per_page: match state.items_per_page() {
            ItemsPerPage::All => ItemsPerPage::All,
            ItemsPerPage::Count(_) => ItemsPerPage::Count(limit),
        },
    }
}

fn client_page(items: &[Value], state: &QueryState, profile: &CollectionProfile) -> ResolvedPage {
    let mut matched = filter_items(items, state, profile);
    sort_items(&mut matched, state.sort_key(), state.sort_direction());

    let total = matched.len() as u64;
    let page = state.page();
    let (per_page, total_pages) = match state.items_per_page() {
        ItemsPerPage::Count(n) => (n.max(1), total.div_ceil(n.max(1))),
        ItemsPerPage::All => (total.max(1), u64::from(total > 0)),
    };

    let start = page.saturating_sub(1).saturating_mul(per_page);
    let shown: Vec<Value> = matched
        .into_iter()
        .skip(usize::try_from(start).unwrap_or(usize::MAX))
        .take(usize::try_from(per_page).unwrap_or(usize::MAX))
        .cloned()
        .collect();
    let (display_from, display_to) = display_range(page, per_page, shown.len() as u64, total);

    ResolvedPage {
        items: shown,
        display_from,
        display_to,
        display_total: total,
        total_pages,
        using_server_pagination: false,
        page,
        items_per_page: state.items_per_page(),
    }
}

/// Keeps the items matching the search term and every active filter.
pub fn filter_items<'a>(
    items: &'a [Value],
    state: &QueryState,
    profile: &CollectionProfile,
) -> Vec<&'a Value> {
    let term = state.search_term().trim().to_lowercase();
    let filters: Vec<(&str, &str)> = state
        .active_filters()
        .map(|(key, value)| (profile.filter_field(key), value))
        .collect();

    items
        .iter()
        .filter(|item| term.is_empty() || matches_search(item, &term, &profile.searchable_fields))
        .filter(|item| {
            filters
                .iter()
                .all(|(field, value)| matches_filter(item, field, value))
        })
        .collect()
}

/// Case-insensitive substring match over the searchable fields, or over
/// every top-level string when none are configured. `term` is lower case.
fn matches_search(item: &Value, term: &str, fields: &[String]) -> bool {
    let contains = |value: &Value| match value {
        Value::String(s) => s.to_lowercase().contains(term),
        Value::Number(n) => n.to_string().contains(term),
        Value::Array(values) => values
            .iter()
            .any(|v| v.as_str().is_some_and(|s| s.to_lowercase().contains(term))),
        _ => false,
    };

    if fields.is_empty() {
        return item
            .as_object()
            .is_some_and(|map| map.values().any(|v| v.is_string() && contains(v)));
    }
    fields
        .iter()
        .filter_map(|field| lookup(item, field))
        .any(contains)
}

/// Exact match on the field's text form. Array fields match when any
/// element does.
fn matches_filter(item: &Value, field: &str, expected: &str) -> bool {
    match lookup(item, field) {
        Some(Value::Array(values)) => values.iter().any(|v| scalar_text(v) == expected),
        Some(value) => scalar_text(value) == expected,
        None => false,
    }
}

/// Stable sort by the value at `key`. An empty key leaves the order alone.
///
/// Descending order is the ascending result reversed, so toggling the
/// direction always flips the page exactly, ties included.
pub fn sort_items(items: &mut [&Value], key: &str, direction: SortDirection) {
    if key.is_empty() {
        return;
    }
    merge_sort(items, &|a: &&Value, b: &&Value| {
        compare_values(lookup(a, key), lookup(b, key))
    });
    if direction == SortDirection::Desc {
        items.reverse();
    }
}

/// Stable top-down merge sort. [`compare_values`] is not transitive across
/// mixed types, which `slice::sort_by` may reject with a panic; this never
/// does and always yields a permutation of its input.
fn merge_sort<T: Copy, F: Fn(&T, &T) -> Ordering>(items: &mut [T], compare: &F) {
    let len = items.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    merge_sort(&mut items[..mid], compare);
    merge_sort(&mut items[mid..], compare);

    let mut merged = Vec::with_capacity(len);
    let (mut i, mut j) = (0, mid);
    while i < mid && j < len {
        if compare(&items[j], &items[i]) == Ordering::Less {
            merged.push(items[j]);
            j += 1;
        } else {
            merged.push(items[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&items[i..mid]);
    merged.extend_from_slice(&items[j..]);
    items.copy_from_slice(&merged);
}

/// Strings compare with [`locale_compare`], numbers numerically; any other
/// pairing, missing values included, compares equal.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => locale_compare(a, b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

/// Case-insensitive comparison; strings differing only in case put the
/// lower-case form first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
