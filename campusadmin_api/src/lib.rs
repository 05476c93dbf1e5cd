//! Transport layer for the campus admin REST API: list query builder,
//! HTTP client and loosely-typed response envelopes.

mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::Client;
pub use self::errors::Error;
pub use self::query::{ListQuery, Query, QueryCommon, SortDirection};
