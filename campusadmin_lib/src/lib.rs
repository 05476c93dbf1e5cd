//! Library layer for campus admin list views: the list query controller,
//! its client-side pipeline, collection profiles and role dashboards.
//!
//! Wraps the `campusadmin_api` transport with a retrying data source, input
//! validation and the page/pager types the UI renders from.

pub mod controller;
pub mod dashboard;
pub mod error;
pub mod page;
pub mod pipeline;
pub mod profile;
pub mod source;
pub mod state;
pub mod validation;

pub use campusadmin_api;
pub use campusadmin_api::types;
pub use campusadmin_api::{Client, ListQuery, Query, SortDirection};

pub use controller::{Applied, FetchOutcome, ListQueryController, PendingFetch};
pub use dashboard::{fetch_dashboard, select_dashboard, Dashboard, Role, StatCard};
pub use error::{AdminError, ListError, Severity, StatusMessage};
pub use page::{Pager, ResolvedPage};
pub use profile::{load_profiles, load_profiles_from_path, CollectionProfile, ProfileError, ProfileSet};
pub use source::{DataSource, HttpSource, ListRequest, RetryConfig, SourceError};
pub use state::{is_no_filter, ItemsPerPage, ListView, QueryState, NO_FILTER};
