//! Collection profiles: what each admin list view fetches and how its items
//! are searched, filtered, sorted and displayed.
//!
//! The built-in set is embedded at compile time from
//! `seed_data/collections.yml`; a replacement set can be loaded from disk.

use std::collections::HashSet;
use std::path::Path;

use campusadmin_api::types::default_collection_paths;
use campusadmin_api::SortDirection;
use serde::Deserialize;
use thiserror::Error;

use crate::state::{ItemsPerPage, ListView, QueryState};

/// Error types for profile loading.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to parse collection profile YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Failed to read collection profile file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Duplicate profile name: {0}")]
    DuplicateName(String),
    #[error("Unknown collection '{name}'. Known collections: {known}")]
    UnknownProfile { name: String, known: String },
    #[error("Invalid profile '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

/// Top-level structure of a profile YAML file.
#[derive(Deserialize, Debug)]
struct ProfileFile {
    profiles: Vec<CollectionProfile>,
}

/// Maps a filter parameter to the item field it constrains.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub key: String,
    pub field: String,
}

fn default_id_fields() -> Vec<String> {
    vec!["_id".to_string(), "id".to_string()]
}

fn default_items_per_page() -> u64 {
    10
}

fn default_direction() -> String {
    "asc".to_string()
}

/// One admin list view's configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct CollectionProfile {
    pub name: String,
    pub endpoint: String,
    /// Endpoint for soft-deleted items. Without one, the deleted view hits
    /// `endpoint` with `status=deleted`.
    #[serde(default)]
    pub deleted_endpoint: Option<String>,
    pub collection_key: String,
    /// Overrides the standard `data.<key>`, `<key>`, `data`, body lookup order.
    #[serde(default)]
    pub collection_paths: Option<Vec<String>>,
    #[serde(default = "default_id_fields")]
    pub id_fields: Vec<String>,
    #[serde(default)]
    pub searchable_fields: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterField>,
    #[serde(default)]
    pub default_sort: String,
    #[serde(default = "default_direction")]
    pub default_direction: String,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u64,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub columns: Vec<String>,
}

impl CollectionProfile {
    /// A bare profile for `collection` served at `/<collection>`.
    pub fn named(collection: &str) -> Self {
        Self {
            name: collection.to_string(),
            endpoint: format!("/{}", collection),
            deleted_endpoint: None,
            collection_key: collection.to_string(),
            collection_paths: None,
            id_fields: default_id_fields(),
            searchable_fields: Vec::new(),
            filters: Vec::new(),
            default_sort: String::new(),
            default_direction: default_direction(),
            items_per_page: default_items_per_page(),
            requires_auth: false,
            columns: Vec::new(),
        }
    }

    /// Paths probed, in order, for the item array.
    pub fn collection_paths(&self) -> Vec<String> {
        match &self.collection_paths {
            Some(paths) => paths.clone(),
            None => default_collection_paths(&self.collection_key),
        }
    }

    /// The item field a filter key constrains; the key itself when unmapped.
    pub fn filter_field<'a>(&'a self, key: &'a str) -> &'a str {
        self.filters
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.field.as_str())
            .unwrap_or(key)
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.default_direction.parse().unwrap_or_default()
    }

    /// Request path and extra parameters for a view.
    pub fn view_target(&self, view: ListView) -> (String, Vec<(String, String)>) {
        match (view, &self.deleted_endpoint) {
            (ListView::Active, _) => (self.endpoint.clone(), Vec::new()),
            (ListView::Deleted, Some(path)) => (path.clone(), Vec::new()),
            (ListView::Deleted, None) => (
                self.endpoint.clone(),
                vec![("status".to_string(), "deleted".to_string())],
            ),
        }
    }

    /// The state a freshly mounted view starts from.
    pub fn initial_state(&self) -> QueryState {
        QueryState::new(
            ItemsPerPage::Count(self.items_per_page),
            &self.default_sort,
            self.sort_direction(),
        )
    }

    fn validate(&self) -> Result<(), ProfileError> {
        let invalid = |reason: &str| ProfileError::Invalid {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !self.endpoint.starts_with('/') {
            return Err(invalid("endpoint must start with '/'"));
        }
        if self.items_per_page == 0 {
            return Err(invalid("items_per_page must be at least 1"));
        }
        if self.default_direction.parse::<SortDirection>().is_err() {
            return Err(invalid("default_direction must be asc or desc"));
        }
        Ok(())
    }
}

/// A validated set of collection profiles.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    profiles: Vec<CollectionProfile>,
}

impl ProfileSet {
    pub fn get(&self, name: &str) -> Result<&CollectionProfile, ProfileError> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ProfileError::UnknownProfile {
                name: name.to_string(),
                known: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionProfile> {
        self.profiles.iter()
    }
}

/// Parse and validate profiles from YAML content.
pub fn parse_profiles(yaml_content: &str) -> Result<ProfileSet, ProfileError> {
    let file: ProfileFile = serde_yml::from_str(yaml_content)?;

    let mut seen = HashSet::new();
    for profile in &file.profiles {
        if !seen.insert(profile.name.to_lowercase()) {
            return Err(ProfileError::DuplicateName(profile.name.clone()));
        }
        profile.validate()?;
    }

    Ok(ProfileSet {
        profiles: file.profiles,
    })
}

/// Load the built-in profiles embedded at compile time.
pub fn load_profiles() -> Result<ProfileSet, ProfileError> {
    let yaml_content = include_str!("../../seed_data/collections.yml");
    parse_profiles(yaml_content)
}

/// Load profiles from a YAML file on disk.
pub fn load_profiles_from_path(path: &Path) -> Result<ProfileSet, ProfileError> {
    let yaml_content = std::fs::read_to_string(path)?;
    parse_profiles(&yaml_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_profiles_load() {
        let set = load_profiles().unwrap();
        for name in ["products", "jobs", "categories", "users", "courses", "classrooms"] {
            assert!(set.get(name).is_ok(), "missing profile {}", name);
        }
    }

    #[test]
    fn products_profile_shape() {
        let set = load_profiles().unwrap();
        let products = set.get("Products").unwrap();
        assert_eq!(products.filter_field("category"), "category._id");
        assert_eq!(products.filter_field("unmapped"), "unmapped");
        assert_eq!(
            products.collection_paths(),
            vec!["data.products", "products", "data", ""]
        );
        assert!(products.requires_auth);
    }

    #[test]
    fn jobs_default_to_newest_first() {
        let set = load_profiles().unwrap();
        let state = set.get("jobs").unwrap().initial_state();
        assert_eq!(state.sort_key(), "createdAt");
        assert_eq!(state.sort_direction(), SortDirection::Desc);
        assert_eq!(state.items_per_page(), ItemsPerPage::Count(10));
    }

    #[test]
    fn deleted_view_without_endpoint_uses_status_param() {
        let profile = CollectionProfile::named("courses");
        let (path, params) = profile.view_target(ListView::Deleted);
        assert_eq!(path, "/courses");
        assert_eq!(params, vec![("status".to_string(), "deleted".to_string())]);
    }

    #[test]
    fn unknown_profile_lists_known_names() {
        let set = parse_profiles("profiles:\n  - name: jobs\n    endpoint: /jobs\n    collection_key: jobs\n").unwrap();
        let err = set.get("widgets").unwrap_err();
        assert!(err.to_string().contains("jobs"));
    }

    #[test]
    fn duplicate_names_rejected() {
        let yaml = "profiles:\n  - name: jobs\n    endpoint: /jobs\n    collection_key: jobs\n  - name: Jobs\n    endpoint: /jobs2\n    collection_key: jobs\n";
        assert!(matches!(
            parse_profiles(yaml),
            Err(ProfileError::DuplicateName(_))
        ));
    }

    #[test]
    fn zero_page_size_rejected() {
        let yaml = "profiles:\n  - name: jobs\n    endpoint: /jobs\n    collection_key: jobs\n    items_per_page: 0\n";
        assert!(matches!(
            parse_profiles(yaml),
            Err(ProfileError::Invalid { .. })
        ));
    }

    #[test]
    fn malformed_yaml_rejected() {
        assert!(matches!(
            parse_profiles("profiles: [unclosed"),
            Err(ProfileError::YamlParse(_))
        ));
    }
}
