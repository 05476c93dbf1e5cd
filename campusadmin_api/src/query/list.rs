use url::Url;

use super::common::{Query, QueryCommon};

/// Query for a collection endpoint (`/products`, `/jobs`, `/categories`, ...).
///
/// Serializes as `?page=&limit=&search=&<filterKey>=...`. Filters are
/// appended in insertion order; callers decide which filter values count as
/// "no filter" and leave those out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub common: QueryCommon,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl Query for ListQuery {
    fn get_common(&mut self) -> &mut QueryCommon {
        &mut self.common
    }

    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = self.common.add_to_url(url);
        if let Some(search) = &self.search {
            url.query_pairs_mut().append_pair("search", search.as_str());
        }
        for (key, value) in self.filters.iter() {
            url.query_pairs_mut()
                .append_pair(key.as_str(), value.as_str());
        }
        url
    }
}

impl ListQuery {
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_filter(mut self, key: &str, value: &str) -> Self {
        self.filters.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_filters(mut self, filters: &[(String, String)]) -> Self {
        self.filters.extend_from_slice(filters);
        self
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use crate::query::{ListQuery, Query};

    #[test]
    fn test_list_query() {
        let url = Url::parse("https://example.com/products").unwrap();

        insta::assert_snapshot!(
            ListQuery::default().add_to_url(&url).to_string(),
            @"https://example.com/products?page=1"
        );

        insta::assert_snapshot!(
            ListQuery::default()
                .with_page(3)
                .with_limit(10)
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/products?page=3&limit=10"
        );

        insta::assert_snapshot!(
            ListQuery::default()
                .with_limit(25)
                .with_search("intro course")
                .with_filter("category", "64f1a2")
                .with_filter("status", "published")
                .add_to_url(&url)
                .to_string(),
            @"https://example.com/products?page=1&limit=25&search=intro+course&category=64f1a2&status=published"
        );
    }
}
