//! Filter, search, sort and pagination state for one list view.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use campusadmin_api::SortDirection;

/// Filter value meaning "no constraint".
pub const NO_FILTER: &str = "all";

/// True for the "no filter" sentinels: `"all"` and the empty string.
pub fn is_no_filter(value: &str) -> bool {
    value.is_empty() || value == NO_FILTER
}

/// Page size selection: a fixed count or everything at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemsPerPage {
    Count(u64),
    All,
}

impl Default for ItemsPerPage {
    fn default() -> Self {
        ItemsPerPage::Count(10)
    }
}

impl fmt::Display for ItemsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemsPerPage::Count(n) => write!(f, "{}", n),
            ItemsPerPage::All => f.write_str("all"),
        }
    }
}

impl FromStr for ItemsPerPage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(ItemsPerPage::All);
        }
        match s.parse::<u64>() {
            Ok(n) if n > 0 => Ok(ItemsPerPage::Count(n)),
            _ => Err(()),
        }
    }
}

/// Which item set a view shows. Views share one controller but never
/// share a page position or a selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListView {
    #[default]
    Active,
    Deleted,
}

/// The query a list view is currently showing.
///
/// Fields are only changed through the setters, which apply the page-reset
/// rules: any change to filters, search, page size or sort key sends the
/// view back to page 1; flipping the direction of the active sort key does not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryState {
    page: u64,
    items_per_page: ItemsPerPage,
    search_term: String,
    filters: BTreeMap<String, String>,
    sort_key: String,
    sort_direction: SortDirection,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(ItemsPerPage::default(), "", SortDirection::Asc)
    }
}

impl QueryState {
    pub fn new(items_per_page: ItemsPerPage, sort_key: &str, sort_direction: SortDirection) -> Self {
        Self {
            page: 1,
            items_per_page,
            search_term: String::new(),
            filters: BTreeMap::new(),
            sort_key: sort_key.to_string(),
            sort_direction,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn items_per_page(&self) -> ItemsPerPage {
        self.items_per_page
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// The selected value for `key`, if one was ever set (sentinels included).
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Filters that actually constrain the result, in key order.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, value)| !is_no_filter(value))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn set_filter(&mut self, key: &str, value: &str) {
        self.filters.insert(key.to_string(), value.to_string());
        self.page = 1;
    }

    pub fn set_search(&mut self, value: &str) {
        self.search_term = value.to_string();
        self.page = 1;
    }

    /// Toggles the direction when `key` is already the sort key; otherwise
    /// switches to `key` ascending and returns to page 1.
    pub fn set_sort(&mut self, key: &str) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_key = key.to_string();
            self.sort_direction = SortDirection::Asc;
            self.page = 1;
        }
    }

    pub fn set_items_per_page(&mut self, value: ItemsPerPage) {
        self.items_per_page = value;
        self.page = 1;
    }

    /// Sets the page unconditionally; bounds are the caller's concern.
    pub(crate) fn set_page(&mut self, page: u64) {
        self.page = page.max(1);
    }

    /// Adopts the page and page size a paginating server reported.
    /// An "all" selection is kept.
    pub(crate) fn snap_to_server(&mut self, page: u64, limit: u64) {
        self.page = page.max(1);
        if let ItemsPerPage::Count(_) = self.items_per_page {
            self.items_per_page = ItemsPerPage::Count(limit);
        }
    }

    /// Returns to page 1 without touching filters, search or sort.
    pub(crate) fn reset_page(&mut self) {
        self.page = 1;
    }
}
